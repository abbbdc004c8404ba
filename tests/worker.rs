mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use myrtio_light_sequencer::cancel::Never;
    use myrtio_light_sequencer::{
        CancelSignal, CancelToken, Duration, Keyframe, OutputDriver, PatternConfig,
        PatternPlayer, RenderWorker, Renderer, Rgb, ThreadPacer,
    };

    #[derive(Clone, Default)]
    struct CountingDriver {
        flushes: Arc<AtomicU32>,
    }

    impl OutputDriver for CountingDriver {
        type Error = core::convert::Infallible;

        fn set_all(&mut self, _color: Rgb) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
        clone.reset();
        assert!(!token.is_cancelled());
        assert!(!Never.is_cancelled());
    }

    #[test]
    fn test_stop_cancels_and_joins() {
        let worker = RenderWorker::spawn("spin", |cancel: CancelToken| {
            let mut rounds = 0u32;
            while !cancel.is_cancelled() {
                rounds = rounds.saturating_add(1);
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            rounds
        })
        .unwrap();

        assert!(!worker.is_finished());
        assert!(worker.stop().is_ok());
    }

    #[test]
    fn test_pattern_runs_on_worker() {
        let driver = CountingDriver::default();
        let flushes = Arc::clone(&driver.flushes);
        let worker = RenderWorker::spawn("pattern", move |cancel| {
            let mut renderer = Renderer::new(driver, ThreadPacer);
            let mut player = PatternPlayer::new(PatternConfig {
                steps: 10,
                ..PatternConfig::default()
            });
            player.run(
                &mut renderer,
                &[
                    Keyframe::from_millis(255, 0, 0, 20),
                    Keyframe::from_millis(0, 255, 0, 20),
                ],
                &cancel,
            )
        })
        .unwrap();

        while flushes.load(Ordering::Relaxed) < 25 {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        let run = worker.stop().unwrap().unwrap();

        assert!(run.frames >= 25);
        assert!(run.cycles >= 1);
    }

    #[test]
    fn test_thread_pacer_sleeps() {
        let mut pacer = ThreadPacer;
        let started = std::time::Instant::now();
        myrtio_light_sequencer::Pacer::pause(&mut pacer, Duration::from_millis(5));
        myrtio_light_sequencer::Pacer::pause(&mut pacer, Duration::from_millis(0));
        assert!(started.elapsed() >= std::time::Duration::from_millis(5));
    }
}
