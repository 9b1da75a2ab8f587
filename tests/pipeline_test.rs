use std::fs;
use std::path::Path;

use tempfile::tempdir;
use veracity::dataset::{CsvRecordReader, load_records, train_test_split};
use veracity::error::VeracityError;
use veracity::ml::naive_bayes::NaiveBayesKind;
use veracity::ml::types::{Label, RawRecord};
use veracity::pipeline::{PipelineConfig, TrainedPipeline, train_pipeline};

const REVIEWS_CSV: &str = "\
text,label
\"Great product, works exactly as described.\",0
I loved the quality and the fast shipping,0
\"Sturdy build, my kids enjoy playing with it every day\",0
Decent value; the battery lasts about two days,0
Comfortable shoes and true to size,0
\"Arrived late, but the seller refunded shipping\",0
BUY NOW!!! Free money - click the link,1
\"Best deal ever, free gift, click here now\",1
\"Amazing amazing amazing, buy buy buy\",1
Click link for free coupon money,1
WINNER!!! limited offer click now,1
\"Free gift card, best offer, buy now\",1
this row is broken
";

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_two_record_example() {
    let records = vec![
        RawRecord::new("great amazing love it", Label::Genuine),
        RawRecord::new("buy now fake spam free money", Label::Fake),
    ];

    let pipeline = train_pipeline(&records, &PipelineConfig::default()).unwrap();
    assert_eq!(
        pipeline.predict_one("great amazing love it product").unwrap(),
        Label::Genuine
    );
}

#[test]
fn test_two_record_example_gaussian() {
    let records = vec![
        RawRecord::new("great amazing love it", Label::Genuine),
        RawRecord::new("buy now fake spam free money", Label::Fake),
    ];
    let mut config = PipelineConfig::default();
    config.classifier.kind = NaiveBayesKind::Gaussian;

    let pipeline = train_pipeline(&records, &config).unwrap();
    assert_eq!(
        pipeline.predict_one("great amazing love it product").unwrap(),
        Label::Genuine
    );
}

#[test]
fn test_load_train_and_evaluate() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "reviews.csv", REVIEWS_CSV);

    let dataset = CsvRecordReader::new().load(&path).unwrap();
    assert_eq!(dataset.len(), 12);
    assert_eq!(dataset.skipped, 1);
    assert_eq!(dataset.label_counts(), [6, 6]);

    let (train, test) = train_test_split(&dataset.records, 0.25, 42).unwrap();
    assert_eq!(train.len(), 9);
    assert_eq!(test.len(), 3);

    let pipeline = train_pipeline(&train, &PipelineConfig::default()).unwrap();
    let evaluation = pipeline.evaluate(&test).unwrap();

    let matrix = evaluation.confusion_matrix;
    assert_eq!(matrix.total(), test.len());
    let support: usize = evaluation.per_class.iter().map(|m| m.support).sum();
    assert_eq!(support, test.len());
    assert!((0.0..=1.0).contains(&evaluation.accuracy));
}

#[test]
fn test_training_data_is_classified() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "reviews.csv", REVIEWS_CSV);
    let records = load_records(&path).unwrap();

    let pipeline = train_pipeline(&records, &PipelineConfig::default()).unwrap();
    assert_eq!(
        pipeline.predict_one("free money, click the link now").unwrap(),
        Label::Fake
    );
    assert_eq!(
        pipeline
            .predict_one("the quality is great and shipping was fast")
            .unwrap(),
        Label::Genuine
    );
}

#[test]
fn test_saved_pipeline_predicts_identically() {
    let dir = tempdir().unwrap();
    let data_path = write_file(dir.path(), "reviews.csv", REVIEWS_CSV);
    let model_path = dir.path().join("model.bin");

    let records = load_records(&data_path).unwrap();
    let pipeline = train_pipeline(&records, &PipelineConfig::default()).unwrap();
    pipeline.save(&model_path).unwrap();

    let loaded = TrainedPipeline::load(&model_path).unwrap();
    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        loaded.predict_batch(&texts).unwrap(),
        pipeline.predict_batch(&texts).unwrap()
    );
    assert_eq!(loaded.config(), pipeline.config());
    assert_eq!(
        loaded.evaluate(&records).unwrap(),
        pipeline.evaluate(&records).unwrap()
    );
}

#[test]
fn test_config_file_drives_training() {
    let dir = tempdir().unwrap();
    let data_path = write_file(dir.path(), "reviews.csv", REVIEWS_CSV);
    let config_path = write_file(
        dir.path(),
        "config.json",
        r#"{
            "vectorizer": { "max_features": 5, "ngram_range": [1, 1] },
            "classifier": { "kind": "gaussian" }
        }"#,
    );

    let config = PipelineConfig::from_json_file(&config_path).unwrap();
    let records = load_records(&data_path).unwrap();
    let pipeline = train_pipeline(&records, &config).unwrap();

    assert_eq!(pipeline.vectorizer().vocabulary_size(), 5);
    assert_eq!(
        pipeline.classifier().model().unwrap().kind(),
        NaiveBayesKind::Gaussian
    );
}

#[test]
fn test_load_failures() {
    let dir = tempdir().unwrap();

    let err = load_records(dir.path().join("missing.csv")).unwrap_err();
    assert!(err.is_invalid_input());

    let header_only = write_file(dir.path(), "empty.csv", "text,label\n");
    let err = load_records(&header_only).unwrap_err();
    assert!(err.is_invalid_input());

    let not_a_model = write_file(dir.path(), "model.bin", "definitely not a model");
    let err = TrainedPipeline::load(&not_a_model).unwrap_err();
    assert!(err.is_invalid_input());

    let err = TrainedPipeline::load(dir.path().join("missing.bin")).unwrap_err();
    assert!(matches!(err, VeracityError::InvalidInput(_)));
}
