use gesturelab::classifier::{Classifier, NearestCentroidClassifier};
use gesturelab::consumers::{CallbackManager, ClassifierPredictor, FileRecorder, Predictor};
use gesturelab::core::{ControlEvent, FrameListener, Sample};
use gesturelab::engine::{Pipeline, PipelineBuilder};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

fn feed_batch(pipeline: &mut Pipeline, frames: &[Vec<f64>]) {
    pipeline.on_event(ControlEvent::Start);
    for frame in frames {
        pipeline.on_frame(frame);
    }
    pipeline.on_event(ControlEvent::Stop);
}

fn ramp(len: usize, axis: usize) -> Vec<Vec<f64>> {
    (0..len)
        .map(|i| {
            let mut frame = vec![0.0, 0.0];
            frame[axis] = 10.0 * i as f64;
            frame
        })
        .collect()
}

fn scaled_config() -> Value {
    json!({
        "assembler": {"type": "discrete", "axes": 2},
        "nodes": [
            {"id": "scale", "type": "absolute_scale", "config": {"scale_size": 4}}
        ],
        "connections": [{"from": "assembler", "to": "scale"}]
    })
}

fn trained_model(dir: &std::path::Path) -> NearestCentroidClassifier {
    let labeled = |frames, id: &str| {
        Sample::from_frames(frames)
            .unwrap()
            .with_gesture_id(Some(id.to_string()))
    };
    let mut classifier = NearestCentroidClassifier::new(4);
    classifier
        .train(&[labeled(ramp(5, 0), "up"), labeled(ramp(5, 1), "side")])
        .unwrap();

    let path = dir.join("model.json");
    classifier.save(&path).unwrap();
    let mut loaded = NearestCentroidClassifier::default();
    loaded.load(&path).unwrap();
    loaded
}

#[test]
fn test_saved_model_classifies_pipeline_output() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = trained_model(dir.path());

    let gestures = Arc::new(Mutex::new(Vec::new()));
    let mut manager = CallbackManager::new();
    let log = gestures.clone();
    manager.set_default_callback(move |id: &str| log.lock().unwrap().push(id.to_string()));
    let predictor = Predictor::new(ClassifierPredictor::new(classifier)).with_receiver(manager);

    let mut pipeline = PipelineBuilder::from_json(scaled_config())
        .unwrap()
        .with_terminal_sink(predictor)
        .build()
        .unwrap();

    feed_batch(&mut pipeline, &ramp(7, 0));
    feed_batch(&mut pipeline, &ramp(3, 1));

    assert_eq!(*gestures.lock().unwrap(), vec!["up", "side"]);
    let scale = pipeline.metrics().get_stage_metrics("scale").unwrap();
    assert_eq!(scale.samples_forwarded(), 2);
}

#[test]
fn test_recorder_and_predictor_share_last_stage() {
    let dir = tempfile::tempdir().unwrap();
    let classifier = trained_model(dir.path());
    let samples_dir = dir.path().join("samples");
    std::fs::create_dir(&samples_dir).unwrap();

    let gestures = Arc::new(Mutex::new(Vec::new()));
    let mut manager = CallbackManager::new();
    let log = gestures.clone();
    manager.attach_callback("side", move |id: &str| log.lock().unwrap().push(id.to_string()));

    let recorder = FileRecorder::new(&samples_dir)
        .unwrap()
        .with_forced_gesture_id("side");
    let mut pipeline = PipelineBuilder::from_json(scaled_config())
        .unwrap()
        .with_terminal_sink(Predictor::new(ClassifierPredictor::new(classifier)).with_receiver(manager))
        .with_terminal_sink(recorder)
        .build()
        .unwrap();

    feed_batch(&mut pipeline, &ramp(6, 1));
    feed_batch(&mut pipeline, &ramp(6, 0));

    assert_eq!(*gestures.lock().unwrap(), vec!["side"]);
    assert_eq!(std::fs::read_dir(&samples_dir).unwrap().count(), 2);
}
