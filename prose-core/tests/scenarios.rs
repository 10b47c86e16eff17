//! End-to-end document construction through the public API.

use std::sync::{Arc, Once};

use prose_core::{
    using_model, using_segmenter, using_tokenizer, with_extraction, with_segmentation, with_tagging,
    without_tokenizer, BoxError, Document, EntityLabel, Error, Extractor, LexiconTagger, Model,
    PerceptronTagger, Pipeline, Segmenter, Sentence, Stage, Tagger, Token, Tokenizer,
};
use prose_core::tokenizer::iter_tokenize;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

struct FailingSegmenter;

impl Segmenter for FailingSegmenter {
    fn segment(&self, _text: &str) -> Result<Vec<Sentence>, BoxError> {
        Err("segmenter exploded".into())
    }
}

struct FailingTokenizer;

impl Tokenizer for FailingTokenizer {
    fn tokenize(&self, _text: &str) -> Result<Vec<Token>, BoxError> {
        Err("tokenizer exploded".into())
    }
}

struct FailingExtractor;

impl Extractor for FailingExtractor {
    fn classify(&self, _tokens: &mut [Token]) -> Result<(), BoxError> {
        Err("extractor exploded".into())
    }
}

/// Tokenizes normally but rejects any text mentioning "boom".
struct FussyTokenizer;

impl Tokenizer for FussyTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, BoxError> {
        if text.contains("boom") {
            return Err(format!("cannot tokenize {text:?}").into());
        }
        Ok(iter_tokenize(text))
    }
}

#[test]
fn test_empty_text_with_defaults() {
    init_tracing();
    let doc = Document::new("", []).unwrap();
    assert!(doc.sentences().is_empty());
    assert!(doc.tokens().is_empty());
    assert!(doc.entities().is_empty());
}

#[test]
fn test_tagging_disabled() {
    init_tracing();
    let doc = Document::new("Dr. Smith went home. He slept.", [with_tagging(false)]).unwrap();

    let sentences: Vec<String> = doc.sentences().into_iter().map(|s| s.text).collect();
    assert_eq!(sentences, ["Dr. Smith went home.", "He slept."]);

    let tokens = doc.tokens();
    assert!(!tokens.is_empty());
    assert_eq!(tokens[0].text, "Dr.");
    assert!(tokens.iter().all(|t| t.tag.is_none()));
}

#[test]
fn test_segmentation_disabled() {
    init_tracing();
    let doc = Document::new("Run!", [with_segmentation(false)]).unwrap();
    assert!(doc.sentences().is_empty());

    let tags: Vec<String> = doc.tokens().into_iter().filter_map(|t| t.tag).collect();
    assert_eq!(tags, ["VB", "."]);
}

#[test]
fn test_tagging_never_reenables_tokenizer() {
    init_tracing();
    let doc = Document::new("text", [without_tokenizer(), with_tagging(true)]).unwrap();
    assert!(doc.tokens().is_empty());
    assert_eq!(doc.sentences().len(), 1);
}

#[test]
fn test_construction_is_repeatable() {
    let text = "The quick brown fox jumps over the lazy dog. Then it slept.";
    let a = Document::new(text, [with_extraction(true)]).unwrap();
    let b = Document::new(text, [with_extraction(true)]).unwrap();
    assert_eq!(a.tokens(), b.tokens());
    assert_eq!(a.sentences(), b.sentences());
    assert_eq!(a.entities(), b.entities());
}

#[test]
fn test_offsets_point_into_original_text() {
    let text = "  She said \u{201C}hello\u{201D} to Paris.  It worked!";
    let doc = Document::new(text, []).unwrap();
    for token in doc.tokens() {
        assert_eq!(&text[token.start..token.end], token.text);
    }
    for sentence in doc.sentences() {
        assert_eq!(&text[sentence.start..sentence.end], sentence.text);
    }
}

#[test]
fn test_extraction_finds_entities() {
    init_tracing();
    let text = "Yesterday Dr. Jane Doe flew from New York to meet Google staff.";
    let doc = Document::new(text, [with_extraction(true)]).unwrap();

    let found: Vec<(String, EntityLabel)> = doc.entities().into_iter().map(|e| (e.text, e.label)).collect();
    assert_eq!(
        found,
        [
            ("Jane Doe".to_string(), EntityLabel::Person),
            ("New York".to_string(), EntityLabel::Gpe),
            ("Google".to_string(), EntityLabel::Org),
        ]
    );
    assert!(doc.tokens().iter().all(|t| t.label.is_some()));
}

#[test]
fn test_extraction_without_tokens_is_empty() {
    let doc = Document::new("Paris is nice.", [without_tokenizer(), with_extraction(true)]).unwrap();
    assert!(doc.entities().is_empty());
}

#[test]
fn test_custom_model_tagger() {
    let mut tagger = PerceptronTagger::new();
    tagger.train(
        &[
            &[("Birds", "NNS"), ("fly", "VBP"), (".", ".")],
            &[("Fish", "NNS"), ("swim", "VBP"), (".", ".")],
        ],
        10,
    );
    let model = Model::new("birds").with_tagger(tagger);
    let doc = Document::new("Birds fly.", [using_model(model)]).unwrap();

    assert_eq!(doc.model().name(), "birds");
    let tags: Vec<String> = doc.tokens().into_iter().filter_map(|t| t.tag).collect();
    assert_eq!(tags, ["NNS", "VBP", "."]);
}

#[test]
fn test_custom_tokenizer_is_used() {
    let doc = Document::new("can't stop", [using_tokenizer(prose_core::UnicodeTokenizer)]).unwrap();
    let words: Vec<String> = doc.tokens().into_iter().map(|t| t.text).collect();
    assert_eq!(words, ["can't", "stop"]);
}

#[test]
fn test_segmenter_failure_names_stage() {
    let err = Document::new("Hello.", [using_segmenter(FailingSegmenter)]).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Segmentation));
    assert!(err.to_string().contains("segmenter exploded"));
}

#[test]
fn test_tokenizer_failure_names_stage() {
    let err = Document::new("Hello.", [using_tokenizer(FailingTokenizer)]).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Tokenization));
}

#[test]
fn test_tagger_failure_names_stage() {
    let model = Model::new("untrained").with_tagger(PerceptronTagger::new());
    let err = Document::new("Hello.", [using_model(model)]).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Tagging));
    assert!(err.to_string().starts_with("tagging stage failed"));
}

#[test]
fn test_extractor_failure_names_stage() {
    let model = Model::new("broken-extractor")
        .with_tagger(LexiconTagger::english())
        .with_extractor(FailingExtractor);
    let err = Document::new("Paris is big.", [using_model(model), with_extraction(true)]).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Extraction));
    assert!(err.to_string().starts_with("extraction stage failed"));
    assert!(err.to_string().contains("extractor exploded"));
}

#[test]
fn test_skipped_stage_cannot_fail() {
    let doc = Document::new("Hello.", [using_segmenter(FailingSegmenter), with_segmentation(false)]).unwrap();
    assert!(doc.sentences().is_empty());
}

#[test]
fn test_model_without_tagger_fails_before_stages_run() {
    let err = Document::new("Hello.", [using_segmenter(FailingSegmenter), using_model(Model::new("bare"))])
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_shared_model_across_documents() {
    let model = Arc::new(Model::new("shared").with_tagger(LexiconTagger::english()));
    let a = Document::new("One.", [using_model(Arc::clone(&model))]).unwrap();
    let b = Document::new("Two.", [using_model(Arc::clone(&model))]).unwrap();
    assert_eq!(a.model().name(), b.model().name());
}

#[test]
fn test_shared_tagger_across_models() {
    let mut perceptron = PerceptronTagger::new();
    perceptron.train(&[&[("Dogs", "NNS"), ("bark", "VBP"), (".", ".")]], 10);
    let tagger: Arc<dyn Tagger> = Arc::new(perceptron);

    let plain = Model::new("plain").with_shared_tagger(Arc::clone(&tagger));
    let extracting = Model::new("extracting")
        .with_shared_tagger(Arc::clone(&tagger))
        .with_shared_extractor(Arc::new(prose_core::GazetteerExtractor::english()));
    assert_eq!(Arc::strong_count(&tagger), 3);

    let a = Document::new("Dogs bark.", [using_model(plain)]).unwrap();
    let b = Document::new("Dogs bark.", [using_model(extracting), with_extraction(true)]).unwrap();
    let tags = |doc: &Document| doc.tokens().into_iter().filter_map(|t| t.tag).collect::<Vec<_>>();
    assert_eq!(tags(&a), ["NNS", "VBP", "."]);
    assert_eq!(tags(&a), tags(&b));
    assert!(b.tokens().iter().all(|t| t.label.is_some()));
}

#[test]
fn test_batch_matches_sequential_runs() {
    init_tracing();
    let pipeline = Pipeline::with_options([with_extraction(true)]);
    let texts = vec![
        "Barack Obama visited Paris.".to_string(),
        String::new(),
        "Microsoft hired Mary in London. She starts Monday.".to_string(),
    ];

    let batch = pipeline.run_batch(&texts);
    assert_eq!(batch.len(), texts.len());
    for (result, text) in batch.into_iter().zip(&texts) {
        let parallel = result.unwrap();
        let sequential = pipeline.run(text).unwrap();
        assert_eq!(parallel.text(), text);
        assert_eq!(parallel.tokens(), sequential.tokens());
        assert_eq!(parallel.entities(), sequential.entities());
    }
}

#[test]
fn test_batch_failure_is_isolated() {
    let pipeline = Pipeline::new().option(using_tokenizer(FussyTokenizer));
    let texts = ["First one.", "This goes boom.", "Third one.", ""];

    let results = pipeline.run_batch(&texts);
    assert_eq!(results.len(), texts.len());

    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Tokenization));
    assert!(err.to_string().contains("This goes boom."));

    for i in [0, 2, 3] {
        let doc = results[i].as_ref().unwrap();
        assert_eq!(doc.text(), texts[i]);
        assert!(doc.tokens().iter().all(|t| t.is_tagged()));
    }
    assert_eq!(results[0].as_ref().unwrap().tokens().len(), 3);
}

#[test]
fn test_document_json() {
    let doc = Document::new("Run!", [with_segmentation(false)]).unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["model"], "default-tagger");
    assert_eq!(json["sentences"], serde_json::json!([]));
    assert_eq!(json["tokens"][0]["text"], "Run");
    assert!(json["tokens"][0].get("label").is_none());
}
