/*!
 * Integration tests for the full translation pipeline.
 *
 * Runs the pipeline end to end against the mock provider and the mock
 * Slides client, checking what gets translated and what gets submitted.
 */

use std::sync::Mutex;

use slidelingo::errors::RemoteServiceError;
use slidelingo::providers::mock::MockProvider;
use slidelingo::translation::{PipelineOptions, TranslationPipeline};

use crate::common;
use crate::common::mock_services::{
    presentation_from_slides, sample_deck, single_shape_presentation, MockSlidesClient,
};

fn french_options() -> PipelineOptions {
    PipelineOptions::new("English", "French").with_max_request(30)
}

#[tokio::test]
async fn test_translatePresentation_helloWorld_shouldSubmitSingleRequest() {
    common::init_test_logging();
    let presentation = single_shape_presentation(&["Hello world", "hi", "https://example.com", "Source: "]);
    let translator = MockProvider::working();
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(presentation),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(translator.received_texts(), vec!["Hello world"]);
    assert!(report.is_complete());
    assert_eq!(report.requests_built, 1);
    assert_eq!(report.runs_seen, 4);
    assert_eq!(report.runs_skipped, 3);
    assert_eq!(report.submissions.len(), 1);
    assert_eq!(report.submissions[0].request_count, 1);
    assert_eq!(report.occurrences_changed(), 1);

    let batches = pipeline.client().batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].original_text, "Hello world");
    assert_eq!(batches[0][0].replacement_text, "[TRANSLATED] Hello world");
}

#[tokio::test]
async fn test_translatePresentation_instruction_shouldCarryLanguagesAndMajor() {
    fn echo_instruction(request: &slidelingo::providers::mock::MockRequest) -> String {
        request.instruction.clone()
    }

    let translator = MockProvider::working().with_custom_response(echo_instruction);
    let pipeline = TranslationPipeline::new(
        translator,
        MockSlidesClient::new(single_shape_presentation(&["Hello world"])),
        french_options().with_major("Biology"),
    );

    pipeline.translate_presentation("deck").await.unwrap();

    let sent = pipeline.client().submitted_requests();
    assert_eq!(
        sent[0].replacement_text,
        "Translate the following text from English into French. Only translate the text, \
         do not return any other characters. Major of text is Biology"
    );
}

#[tokio::test]
async fn test_translatePresentation_oneRunFails_shouldIsolateFailure() {
    let presentation = presentation_from_slides(&[
        &["First slide text", "Second run here"],
        &["Broken text", "Fourth run here"],
    ]);
    let pipeline = TranslationPipeline::new(
        MockProvider::failing_on("Broken text"),
        MockSlidesClient::new(presentation),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(report.exceptions.len(), 1);
    assert_eq!(report.exceptions[0].text, "Broken text");
    assert_eq!(report.exceptions[0].slide_number, 2);
    assert_eq!(report.requests_built, 3);

    let sent = pipeline.client().submitted_requests();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|r| r.original_text != "Broken text"));
}

#[tokio::test]
async fn test_translatePresentation_intermittentFailures_shouldKeepTheRest() {
    let texts: Vec<String> = (1..=6).map(|i| format!("Paragraph {}", i)).collect();
    let runs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let pipeline = TranslationPipeline::new(
        MockProvider::intermittent(3),
        MockSlidesClient::new(single_shape_presentation(&runs)),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    let failed: Vec<_> = report.exceptions.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(failed, vec!["Paragraph 3", "Paragraph 6"]);
    assert_eq!(report.requests_built, 4);
    assert!(report.exceptions[0].error.contains("503"));
}

#[tokio::test]
async fn test_translatePresentation_emptyTranslation_shouldBeRecordedAsFailure() {
    let pipeline = TranslationPipeline::new(
        MockProvider::empty(),
        MockSlidesClient::new(single_shape_presentation(&["Hello world", "Goodbye world"])),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(report.exceptions.len(), 2);
    assert_eq!(report.requests_built, 0);
    assert!(report.submissions.is_empty());
    assert!(pipeline.client().batches().is_empty());
}

#[tokio::test]
async fn test_translatePresentation_ineligibleRuns_shouldNeverReachTranslator() {
    let presentation = single_shape_presentation(&["\n", "abcd", "https://x.y/zzzzz", "Source: ", "Q&A"]);
    let translator = MockProvider::working();
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(presentation),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(translator.request_count(), 0);
    assert_eq!(report.runs_skipped, 5);
    assert_eq!(report.requests_built, 0);
    // Nothing to submit, so no batch call either
    assert!(pipeline.client().batches().is_empty());
}

#[tokio::test]
async fn test_translatePresentation_withDeduplication_shouldTranslateRepeatsOnce() {
    let translator = MockProvider::working();
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(sample_deck()),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(
        translator.received_texts(),
        vec![
            "Quarterly results",
            "Revenue grew steadily",
            "Market overview",
            "Internal data",
            "Next steps",
        ]
    );
    assert_eq!(report.slides_total, 3);
    assert_eq!(report.slides_processed, 3);
    assert_eq!(report.runs_seen, 10);
    assert_eq!(report.runs_skipped, 4);
    assert_eq!(report.duplicates_merged, 1);
    assert_eq!(report.requests_built, 5);
}

#[tokio::test]
async fn test_translatePresentation_withoutDeduplication_shouldTranslateEveryOccurrence() {
    let translator = MockProvider::working();
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(sample_deck()),
        french_options().with_deduplicate(false),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(translator.request_count(), 6);
    assert_eq!(report.duplicates_merged, 0);
    assert_eq!(report.requests_built, 6);

    let repeated = pipeline
        .client()
        .submitted_requests()
        .into_iter()
        .filter(|r| r.original_text == "Quarterly results")
        .count();
    assert_eq!(repeated, 2);
}

#[tokio::test]
async fn test_translatePresentation_withSlideCap_shouldOnlyProcessFirstSlides() {
    let translator = MockProvider::working();
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(sample_deck()),
        french_options().with_max_slides(Some(2)),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(report.slides_total, 3);
    assert_eq!(report.slides_processed, 2);
    assert!(!translator.received_texts().contains(&"Next steps".to_string()));
    assert_eq!(report.requests_built, 4);
}

#[tokio::test]
async fn test_translatePresentation_capAboveSlideCount_shouldProcessAllSlides() {
    let pipeline = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(sample_deck()),
        french_options().with_max_slides(Some(50)),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();
    assert_eq!(report.slides_processed, 3);
}

#[tokio::test]
async fn test_translatePresentation_concurrent_shouldMatchSequentialOutput() {
    let texts: Vec<String> = (0..12).map(|i| format!("Sentence number {}", i)).collect();
    let runs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let sequential = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(single_shape_presentation(&runs)),
        french_options(),
    );
    let concurrent = TranslationPipeline::new(
        MockProvider::slow(5),
        MockSlidesClient::new(single_shape_presentation(&runs)),
        french_options().with_concurrent_requests(4),
    );

    sequential.translate_presentation("deck").await.unwrap();
    concurrent.translate_presentation("deck").await.unwrap();

    assert_eq!(
        sequential.client().submitted_requests(),
        concurrent.client().submitted_requests()
    );
}

#[tokio::test]
async fn test_translatePresentation_oneRunPerSlide_shouldStillRunConcurrently() {
    let presentation = presentation_from_slides(&[
        &["Opening remarks"],
        &["Agenda for today"],
        &["Budget overview"],
        &["Closing thoughts"],
    ]);
    let translator = MockProvider::slow(20);
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(presentation),
        french_options().with_concurrent_requests(4),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(translator.peak_in_flight(), 4);
    assert_eq!(report.requests_built, 4);
}

#[tokio::test]
async fn test_translatePresentation_sequential_shouldKeepOneCallInFlight() {
    let translator = MockProvider::slow(1);
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(sample_deck()),
        french_options(),
    );

    pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(translator.peak_in_flight(), 1);
}

#[tokio::test]
async fn test_translatePresentation_manyRequests_shouldChunkByMaxRequest() {
    let texts: Vec<String> = (0..65).map(|i| format!("Bullet point {:03}", i)).collect();
    let runs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let pipeline = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(single_shape_presentation(&runs)),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    let sizes: Vec<_> = pipeline.client().batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![30, 30, 5]);
    assert_eq!(report.submissions.len(), 3);
    assert_eq!(report.occurrences_changed(), 65);
}

#[tokio::test]
async fn test_translatePresentation_fetchFails_shouldAbortBeforeTranslating() {
    let translator = MockProvider::working();
    let pipeline = TranslationPipeline::new(
        translator.clone(),
        MockSlidesClient::new(sample_deck()).failing_fetch(),
        french_options(),
    );

    let error = pipeline.translate_presentation("deck").await.unwrap_err();

    assert!(matches!(error, RemoteServiceError::Api { status_code: 404, .. }));
    assert_eq!(translator.request_count(), 0);
    assert!(pipeline.client().batches().is_empty());
}

#[tokio::test]
async fn test_translatePresentation_submissionFails_shouldPropagateError() {
    let texts: Vec<String> = (0..4).map(|i| format!("Line of text {}", i)).collect();
    let runs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let pipeline = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(single_shape_presentation(&runs)).failing_on_batch(2),
        french_options().with_max_request(2),
    );

    let error = pipeline.translate_presentation("deck").await.unwrap_err();

    assert!(matches!(
        error,
        RemoteServiceError::PartialBatch { failed_chunk: 2, total_chunks: 2, applied_chunks: 1, .. }
    ));
}

#[tokio::test]
async fn test_translatePresentation_emptyPresentation_shouldMakeNoBatchCall() {
    let presentation = presentation_from_slides(&[]);
    let pipeline = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(presentation),
        french_options(),
    );

    let report = pipeline.translate_presentation("deck").await.unwrap();

    assert_eq!(pipeline.client().fetch_count(), 1);
    assert_eq!(report.slides_total, 0);
    assert!(report.submissions.is_empty());
    assert!(pipeline.client().batches().is_empty());
}

#[tokio::test]
async fn test_translatePresentationWithProgress_shouldReportEverySlide() {
    let progress = Mutex::new(Vec::new());
    let pipeline = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(sample_deck()),
        french_options(),
    );

    pipeline
        .translate_presentation_with_progress("deck", |done, total| {
            progress.lock().unwrap().push((done, total));
        })
        .await
        .unwrap();

    assert_eq!(progress.into_inner().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_translatePresentationWithProgress_slideWithoutRuns_shouldCountAsDone() {
    let progress = Mutex::new(Vec::new());
    let presentation = presentation_from_slides(&[&["Q&A"], &["Welcome aboard"]]);
    let pipeline = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(presentation),
        french_options(),
    );

    pipeline
        .translate_presentation_with_progress("deck", |done, total| {
            progress.lock().unwrap().push((done, total));
        })
        .await
        .unwrap();

    assert_eq!(progress.into_inner().unwrap(), vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_buildBatch_shouldNotSubmitAnything() {
    let pipeline = TranslationPipeline::new(
        MockProvider::working(),
        MockSlidesClient::new(sample_deck()),
        french_options(),
    );

    let (batch, report) = pipeline.build_batch(&sample_deck(), |_, _| {}).await;

    assert_eq!(batch.len(), report.requests_built);
    assert_eq!(pipeline.client().fetch_count(), 0);
    assert!(pipeline.client().batches().is_empty());
}
