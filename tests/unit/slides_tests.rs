/*!
 * Tests for the presentation model, text extraction and URL parsing
 */

use serde_json::json;
use slidelingo::errors::InvalidInputError;
use slidelingo::slides::{extract_slide_runs, extract_text_runs, parse_presentation_id, PageElement, Presentation};

/// A trimmed-down presentations.get response
fn presentation_json() -> serde_json::Value {
    json!({
        "presentationId": "deck42",
        "title": "Team update",
        "pageSize": { "width": { "magnitude": 9144000, "unit": "EMU" } },
        "slides": [
            {
                "objectId": "p1",
                "pageElements": [
                    {
                        "objectId": "title",
                        "shape": {
                            "shapeType": "TEXT_BOX",
                            "text": { "textElements": [
                                { "paragraphMarker": {} },
                                { "textRun": { "content": "Welcome everyone" } },
                                { "textRun": { "content": "\n" } }
                            ] }
                        }
                    },
                    { "objectId": "img", "image": { "contentUrl": "https://example.com/a.png" } },
                    {
                        "objectId": "grp",
                        "elementGroup": { "children": [
                            { "shape": { "text": { "textElements": [ { "textRun": { "content": "Inside group" } } ] } } },
                            { "elementGroup": { "children": [
                                { "shape": { "text": { "textElements": [ { "textRun": { "content": "Deeply nested" } } ] } } }
                            ] } }
                        ] }
                    }
                ]
            },
            { "objectId": "p2" }
        ]
    })
}

#[test]
fn test_deserialize_presentation_shouldBuildElementTree() {
    let presentation: Presentation = serde_json::from_value(presentation_json()).unwrap();

    assert_eq!(presentation.presentation_id, "deck42");
    assert_eq!(presentation.title.as_deref(), Some("Team update"));
    assert_eq!(presentation.slides.len(), 2);
    assert!(presentation.slides[1].page_elements.is_empty());

    let elements = &presentation.slides[0].page_elements;
    assert_eq!(elements[0], PageElement::shape(["Welcome everyone", "\n"]));
    assert_eq!(elements[1], PageElement::Other);
    assert!(matches!(elements[2], PageElement::Group { .. }));
}

#[test]
fn test_extract_fromDeserializedSlide_shouldFollowDocumentOrder() {
    let presentation: Presentation = serde_json::from_value(presentation_json()).unwrap();

    let runs = extract_slide_runs(&presentation.slides[0]);
    assert_eq!(runs, vec!["Welcome everyone", "\n", "Inside group", "Deeply nested"]);

    // Unchanged tree, same sequence
    assert_eq!(extract_slide_runs(&presentation.slides[0]), runs);
    assert!(extract_slide_runs(&presentation.slides[1]).is_empty());
}

#[test]
fn test_extract_duplicateRuns_shouldBeKept() {
    let elements = vec![
        PageElement::shape(["Repeated text"]),
        PageElement::group(vec![PageElement::shape(["Repeated text"])]),
    ];
    assert_eq!(extract_text_runs(&elements), vec!["Repeated text", "Repeated text"]);
}

#[test]
fn test_parsePresentationId_validUrls_shouldReturnId() {
    assert_eq!(
        parse_presentation_id("https://docs.google.com/presentation/d/1AbC-xyz_09/edit").unwrap(),
        "1AbC-xyz_09"
    );
    assert_eq!(
        parse_presentation_id("\"https://docs.google.com/presentation/d/deck42\"").unwrap(),
        "deck42"
    );
}

#[test]
fn test_parsePresentationId_otherUrls_shouldBeRejected() {
    assert!(matches!(
        parse_presentation_id("https://docs.google.com/document/d/abc/edit"),
        Err(InvalidInputError::InvalidUrl(_))
    ));
    assert!(matches!(
        parse_presentation_id("not a url at all"),
        Err(InvalidInputError::InvalidUrl(_))
    ));
    assert!(matches!(
        parse_presentation_id("https://docs.google.com/presentation/d/"),
        Err(InvalidInputError::MissingPresentationId(_))
    ));
}
