/*!
 * Presentation data model.
 *
 * A read-only snapshot of a hosted presentation, reduced to what the
 * translation pipeline needs: slides, their page elements, and the text runs
 * inside shapes. The Slides REST representation marks element kinds by field
 * presence (`shape`, `elementGroup`, `image`, ...); deserialization folds that
 * into the closed [`PageElement`] enum so traversal never probes for fields.
 */

use serde::Deserialize;

/// A presentation snapshot fetched once per run
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Opaque presentation identifier
    #[serde(default)]
    pub presentation_id: String,

    /// Presentation title, if the service reported one
    #[serde(default)]
    pub title: Option<String>,

    /// Slides in display order
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// A single slide
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Object ID of the slide page
    #[serde(default)]
    pub object_id: String,

    /// Page elements in z-order, which is also document order
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
}

/// A page element: a shape with text, a group of elements, or anything else
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawPageElement")]
pub enum PageElement {
    /// A shape and the contents of its text runs, in text-body order
    Shape {
        /// Text run contents
        text_runs: Vec<String>,
    },

    /// A group nesting further page elements
    Group {
        /// Child elements in order
        children: Vec<PageElement>,
    },

    /// Images, tables, lines, videos and other kinds without translatable runs
    Other,
}

impl PageElement {
    /// Build a shape from its run contents
    pub fn shape<I, S>(runs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Shape {
            text_runs: runs.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a group from its children
    pub fn group(children: Vec<PageElement>) -> Self {
        Self::Group { children }
    }
}

impl Presentation {
    /// Build a presentation from slides, mostly for tests and fixtures
    pub fn new(presentation_id: impl Into<String>, slides: Vec<Slide>) -> Self {
        Self {
            presentation_id: presentation_id.into(),
            title: None,
            slides,
        }
    }
}

impl Slide {
    /// Build a slide from its page elements
    pub fn new(object_id: impl Into<String>, page_elements: Vec<PageElement>) -> Self {
        Self {
            object_id: object_id.into(),
            page_elements,
        }
    }
}

// Wire shapes of the Slides API. Only the fields we read are declared.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageElement {
    #[serde(default)]
    shape: Option<RawShape>,
    #[serde(default)]
    element_group: Option<RawGroup>,
}

#[derive(Debug, Deserialize)]
struct RawShape {
    #[serde(default)]
    text: Option<RawTextContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextContent {
    #[serde(default)]
    text_elements: Vec<RawTextElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextElement {
    #[serde(default)]
    text_run: Option<RawTextRun>,
}

#[derive(Debug, Deserialize)]
struct RawTextRun {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default)]
    children: Vec<PageElement>,
}

impl From<RawPageElement> for PageElement {
    fn from(raw: RawPageElement) -> Self {
        if let Some(shape) = raw.shape {
            let text_runs = shape
                .text
                .map(|text| {
                    text.text_elements
                        .into_iter()
                        .filter_map(|element| element.text_run)
                        .map(|run| run.content)
                        .collect()
                })
                .unwrap_or_default();
            PageElement::Shape { text_runs }
        } else if let Some(group) = raw.element_group {
            PageElement::Group {
                children: group.children,
            }
        } else {
            PageElement::Other
        }
    }
}
