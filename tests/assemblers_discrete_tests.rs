use gesturelab::assemblers::DiscreteAssembler;
use gesturelab::core::{ControlEvent, FrameListener};
use gesturelab::hal::{FrameDispatcher, SourceEvent};
use gesturelab::nodes::ChannelSink;

#[test]
fn test_three_by_three_batch_end_to_end() {
    let (sink, rx) = ChannelSink::unbounded();
    let mut assembler = DiscreteAssembler::new(3);
    assembler.attach(sink);

    let mut dispatcher = FrameDispatcher::new();
    dispatcher.attach(assembler);

    dispatcher.notify_event(ControlEvent::Start);
    dispatcher.notify_frame(&[1.0, 2.0, 3.0]);
    dispatcher.notify_frame(&[4.0, 5.0, 6.0]);
    dispatcher.notify_frame(&[7.0, 8.0, 9.0]);
    dispatcher.notify_event(ControlEvent::Stop);

    let sample = rx.try_recv().unwrap();
    assert_eq!(
        sample.to_rows(),
        vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]]
    );
    assert!(sample.gesture_id.is_none());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_idle_frames_never_emitted() {
    let (sink, rx) = ChannelSink::unbounded();
    let mut assembler = DiscreteAssembler::new(1);
    assembler.attach(sink);

    assembler.on_frame(&[100.0]);
    assembler.on_event(ControlEvent::Start);
    assembler.on_frame(&[1.0]);
    assembler.on_event(ControlEvent::Stop);
    assembler.on_frame(&[200.0]);
    assembler.on_event(ControlEvent::Start);
    assembler.on_frame(&[2.0]);
    assembler.on_event(ControlEvent::Stop);

    let first = rx.try_recv().unwrap();
    let second = rx.try_recv().unwrap();
    assert_eq!(first.as_slice(), &[1.0]);
    assert_eq!(second.as_slice(), &[2.0]);
}

#[test]
fn test_stop_while_idle_emits_empty_sample() {
    let (sink, rx) = ChannelSink::unbounded();
    let mut assembler = DiscreteAssembler::new(4);
    assembler.attach(sink);

    assembler.on_event(ControlEvent::Stop);

    let sample = rx.try_recv().unwrap();
    assert_eq!(sample.frame_count(), 0);
    assert_eq!(sample.axis_count(), 4);
}

#[test]
fn test_error_and_timeout_do_not_end_batch() {
    let (sink, rx) = ChannelSink::unbounded();
    let mut dispatcher = FrameDispatcher::new();
    let mut assembler = DiscreteAssembler::new(2);
    assembler.attach(sink);
    dispatcher.attach(assembler);

    for event in [
        SourceEvent::Control(ControlEvent::Start),
        SourceEvent::Frame(vec![1.0, 1.0]),
        SourceEvent::Control(ControlEvent::Timeout),
        SourceEvent::Control(ControlEvent::Error),
        SourceEvent::Frame(vec![2.0, 2.0]),
        SourceEvent::Control(ControlEvent::Stop),
    ] {
        dispatcher.dispatch(&event);
    }

    assert_eq!(rx.try_recv().unwrap().frame_count(), 2);
}

#[test]
fn test_detached_consumer_stops_receiving() {
    let (first, first_rx) = ChannelSink::unbounded();
    let (second, second_rx) = ChannelSink::unbounded();
    let mut assembler = DiscreteAssembler::new(1);
    let id = assembler.attach(first);
    assembler.attach(second);

    assert!(assembler.detach(id).is_some());
    assembler.on_event(ControlEvent::Start);
    assembler.on_frame(&[3.0]);
    assembler.on_event(ControlEvent::Stop);

    assert!(first_rx.try_recv().is_err());
    assert_eq!(second_rx.try_recv().unwrap().as_slice(), &[3.0]);
}
