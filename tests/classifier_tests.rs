use gesturelab::classifier::{dataset, Classifier, NearestCentroidClassifier};
use gesturelab::core::Sample;
use gesturelab::nodes::AbsoluteScale;
use gesturelab::GestureError;
use tempfile::tempdir;

fn labeled(values: &[f64], id: &str) -> Sample {
    Sample::from_frames(values.iter().map(|v| vec![*v, -*v]).collect())
        .unwrap()
        .with_gesture_id(Some(id.to_string()))
}

#[test]
fn test_predict_before_training() {
    let classifier = NearestCentroidClassifier::default();
    assert!(!classifier.is_trained());
    assert!(matches!(
        classifier.predict(&labeled(&[1.0], "x")),
        Err(GestureError::ModelNotReady)
    ));
}

#[test]
fn test_train_save_load_predict() {
    let dir = tempdir().unwrap();
    let model_path = dir.path().join("model.json");

    let mut classifier = NearestCentroidClassifier::new(8);
    let score = classifier
        .train(&[
            labeled(&[0.0, 1.0, 2.0, 3.0], "up"),
            labeled(&[0.0, 2.0, 4.0], "up"),
            labeled(&[3.0, 2.0, 1.0, 0.0], "down"),
            labeled(&[6.0, 3.0, 0.0], "down"),
        ])
        .unwrap();
    assert_eq!(score, 1.0);
    classifier.save(&model_path).unwrap();

    let mut restored = NearestCentroidClassifier::default();
    restored.load(&model_path).unwrap();
    assert!(restored.is_trained());
    assert_eq!(restored.gesture_ids().collect::<Vec<_>>(), vec!["down", "up"]);
    assert_eq!(restored.predict(&labeled(&[1.0, 2.0, 3.0, 4.0], "?")).unwrap(), "up");
    assert_eq!(restored.predict(&labeled(&[5.0, 1.0], "?")).unwrap(), "down");
}

#[test]
fn test_empty_training_set_rejected() {
    let mut classifier = NearestCentroidClassifier::default();
    assert!(classifier.train(&[]).is_err());
    assert!(classifier.save(&tempdir().unwrap().path().join("m.json")).is_err());
}

#[test]
fn test_dataset_loads_sorted_txt_files() {
    let dir = tempdir().unwrap();
    labeled(&[1.0], "b").save_to_file(dir.path().join("b_1.txt")).unwrap();
    labeled(&[2.0], "a").save_to_file(dir.path().join("a_1.txt")).unwrap();
    labeled(&[3.0], "a").save_to_file(dir.path().join("a_2.txt")).unwrap();
    std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

    let samples = dataset::load_dir(dir.path()).unwrap();
    let ids: Vec<_> = samples.iter().map(|s| s.gesture_id.clone().unwrap()).collect();
    assert_eq!(ids, vec!["a", "a", "b"]);
    assert_eq!(samples[1].get(0, 0), Some(3.0));

    let counts = dataset::count_by_gesture(&samples);
    assert_eq!(counts["a"], 2);
    assert_eq!(counts["b"], 1);
}

#[test]
fn test_preprocess_with_stage() {
    let samples = vec![labeled(&[1.0, -2.0], "a"), labeled(&[4.0, 5.0, 6.0], "b")];
    let mut scale = AbsoluteScale::new(5);
    let processed = dataset::preprocess(samples, &mut scale);
    assert!(processed.iter().all(|s| s.frame_count() == 5));
    assert!(processed.iter().all(|s| s.as_slice().iter().all(|v| *v >= 0.0)));
    assert_eq!(processed[1].gesture_id.as_deref(), Some("b"));
}
