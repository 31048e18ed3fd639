/*!
 * Text run extraction from page element trees.
 */

use super::model::{PageElement, Slide};

/// Collect every text run under `elements` in document order.
///
/// Shapes contribute their runs in text-body order, groups contribute the
/// runs of their children in order, and anything else contributes nothing.
/// Runs are returned as-is; no filtering or deduplication happens here.
pub fn extract_text_runs(elements: &[PageElement]) -> Vec<String> {
    let mut runs = Vec::new();
    collect_runs(elements, &mut runs);
    runs
}

/// Collect the text runs of one slide
pub fn extract_slide_runs(slide: &Slide) -> Vec<String> {
    extract_text_runs(&slide.page_elements)
}

fn collect_runs(elements: &[PageElement], runs: &mut Vec<String>) {
    for element in elements {
        match element {
            PageElement::Shape { text_runs } => runs.extend(text_runs.iter().cloned()),
            PageElement::Group { children } => collect_runs(children, runs),
            PageElement::Other => {}
        }
    }
}
