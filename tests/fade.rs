mod common;

mod tests {
    use std::cell::Cell;
    use std::sync::atomic::AtomicBool;

    use myrtio_light_sequencer::cancel::Never;
    use myrtio_light_sequencer::color::encode;
    use myrtio_light_sequencer::{Duration, FadeOutcome, FadeSegment, Rgb, SequencerError};

    use super::common::{RecordingDriver, harness, harness_with};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };

    #[test]
    fn test_frames_stay_within_bounds() {
        let from = Rgb::new(10, 200, 90);
        let to = Rgb::new(240, 20, 90);
        for brightness in [1.0_f32, 0.55, 0.1] {
            let segment = FadeSegment::new(from, to, Duration::from_millis(1000), 64)
                .with_brightness(brightness);
            let frames: Vec<Rgb> = segment.frames().collect();
            assert_eq!(frames.len(), 64);
            for frame in frames {
                for (value, a, b) in [
                    (frame.r, from.r, to.r),
                    (frame.g, from.g, to.g),
                    (frame.b, from.b, to.b),
                ] {
                    let low = (f32::from(a.min(b)) * brightness).floor();
                    let high = f32::from(a.max(b)) * brightness;
                    let value = f32::from(value);
                    assert!(value >= low && value <= high, "{value} not in {low}..={high}");
                }
            }
        }
    }

    #[test]
    fn test_first_frame_is_start_color() {
        let segment = FadeSegment::new(RED, GREEN, Duration::from_millis(300), 300);
        let mut frames = segment.frames();
        assert_eq!(frames.len(), 300);
        assert_eq!(frames.next(), Some(RED));
        assert_eq!(frames.nth(149), Some(Rgb::new(127, 127, 0)));
    }

    #[test]
    fn test_fade_writes_encoded_frames_and_paces() {
        let mut h = harness();
        let segment = FadeSegment::new(RED, GREEN, Duration::from_millis(1000), 4);

        let outcome = h.renderer.fade(&segment, &Never).unwrap();

        assert_eq!(outcome, FadeOutcome::Completed { frames: 4 });
        let expected: Vec<Rgb> = segment.frames().map(encode).collect();
        assert_eq!(*h.frames.borrow(), expected);
        assert_eq!(*h.pauses.borrow(), vec![Duration::from_millis(250); 4]);
    }

    #[test]
    fn test_zero_steps_emits_nothing() {
        let mut h = harness();
        let segment = FadeSegment::new(RED, GREEN, Duration::from_millis(1000), 0);

        let outcome = h.renderer.fade(&segment, &Never).unwrap();

        assert_eq!(outcome, FadeOutcome::Completed { frames: 0 });
        assert!(h.frames.borrow().is_empty());
        assert!(h.pauses.borrow().is_empty());
    }

    #[test]
    fn test_zero_duration_emits_back_to_back() {
        let mut h = harness();
        let segment = FadeSegment::new(RED, GREEN, Duration::from_millis(0), 3);

        h.renderer.fade(&segment, &Never).unwrap();

        assert_eq!(h.frames.borrow().len(), 3);
        assert!(h.pauses.borrow().is_empty());
    }

    #[test]
    fn test_hold_is_single_frame_and_full_pause() {
        let mut h = harness();
        let segment = FadeSegment::hold(GREEN, Duration::from_millis(200));

        h.renderer.fade(&segment, &Never).unwrap();

        assert_eq!(*h.frames.borrow(), vec![GREEN]);
        assert_eq!(*h.pauses.borrow(), vec![Duration::from_millis(200)]);
    }

    #[test]
    fn test_renderer_hold_encodes_color() {
        let mut h = harness();
        let color = Rgb::new(128, 64, 0);

        let outcome = h
            .renderer
            .hold(color, Duration::from_millis(750), &Never)
            .unwrap();

        assert_eq!(outcome, FadeOutcome::Completed { frames: 1 });
        assert_eq!(*h.frames.borrow(), vec![encode(color)]);
        assert_eq!(*h.pauses.borrow(), vec![Duration::from_millis(750)]);
    }

    #[test]
    fn test_raised_flag_cancels_before_first_frame() {
        let mut h = harness();
        let flag = AtomicBool::new(true);

        let outcome = h
            .renderer
            .hold(RED, Duration::from_millis(750), &flag)
            .unwrap();

        assert_eq!(outcome, FadeOutcome::Cancelled { frames: 0 });
        assert!(h.frames.borrow().is_empty());
        assert!(h.pauses.borrow().is_empty());
    }

    #[test]
    fn test_cancel_after_n_checks_limits_frames() {
        for n in [0_usize, 1, 7, 49] {
            let mut h = harness();
            let checks = Cell::new(0_usize);
            let cancel = || {
                checks.set(checks.get() + 1);
                checks.get() > n
            };
            let segment = FadeSegment::new(RED, GREEN, Duration::from_millis(500), 50);

            let outcome = h.renderer.fade(&segment, &cancel).unwrap();

            assert!(h.frames.borrow().len() <= n);
            assert_eq!(outcome.frames() as usize, h.frames.borrow().len());
            assert!(outcome.is_cancelled());
        }
    }

    #[test]
    fn test_driver_failure_is_render_failure() {
        let mut h = harness_with(RecordingDriver::failing_after(2));
        let segment = FadeSegment::new(RED, GREEN, Duration::from_millis(100), 10);

        let err = h.renderer.fade(&segment, &Never).unwrap_err();

        assert!(matches!(err, SequencerError::RenderFailure(_)));
        assert_eq!(h.frames.borrow().len(), 2);
    }
}
