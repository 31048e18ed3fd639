/*!
 * Hosted presentation access.
 *
 * - `model`: presentation snapshot and its mapping from the Slides REST JSON
 * - `extract`: text run extraction from page element trees
 * - `url`: presentation URL validation
 * - `client`: the `DocumentBatchClient` capability and its Slides API client
 */

pub use self::client::{BatchResult, DocumentBatchClient, SlidesClient};
pub use self::extract::{extract_slide_runs, extract_text_runs};
pub use self::model::{PageElement, Presentation, Slide};
pub use self::url::parse_presentation_id;

pub mod client;
pub mod extract;
pub mod model;
pub mod url;
