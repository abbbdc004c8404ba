mod tests {
    use myrtio_light_sequencer::cancel::Never;
    use myrtio_light_sequencer::color::encode;
    use myrtio_light_sequencer::{
        Duration, FadeSegment, OutputDriver, Pacer, Renderer, Rgb, SequencerError,
        SmartLedsDriver,
    };
    use smart_leds::SmartLedsWrite;

    #[derive(Default)]
    struct StripWriter {
        writes: Vec<Vec<Rgb>>,
        broken: bool,
    }

    impl SmartLedsWrite for StripWriter {
        type Error = &'static str;
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.broken {
                return Err("data line stuck");
            }
            self.writes.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    struct NoPause;

    impl Pacer for NoPause {
        fn pause(&mut self, _duration: Duration) {}
    }

    #[test]
    fn test_set_all_fills_whole_strip() {
        let mut driver = SmartLedsDriver::new(StripWriter::default(), 5);
        assert_eq!(driver.led_count(), 5);

        driver.set_all(Rgb::new(1, 2, 3)).unwrap();
        assert!(driver.frame().iter().all(|led| *led == Rgb::new(1, 2, 3)));
        driver.flush().unwrap();

        let writer = driver.into_inner();
        assert_eq!(writer.writes, vec![vec![Rgb::new(1, 2, 3); 5]]);
    }

    #[test]
    fn test_renderer_drives_strip() {
        let driver = SmartLedsDriver::new(StripWriter::default(), 3);
        let mut renderer = Renderer::new(driver, NoPause);
        let segment = FadeSegment::new(
            Rgb::new(0, 0, 0),
            Rgb::new(200, 200, 200),
            Duration::from_millis(20),
            2,
        );

        renderer.fade(&segment, &Never).unwrap();

        let (driver, _) = renderer.into_parts();
        let writes = driver.into_inner().writes;
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1], vec![encode(Rgb::new(100, 100, 100)); 3]);
    }

    #[test]
    fn test_writer_error_surfaces() {
        let writer = StripWriter {
            broken: true,
            ..StripWriter::default()
        };
        let mut renderer = Renderer::new(SmartLedsDriver::new(writer, 3), NoPause);

        let err = renderer.write(Rgb::new(9, 9, 9)).unwrap_err();

        assert!(matches!(err, SequencerError::RenderFailure(message) if message.contains("stuck")));
    }

    #[test]
    fn test_custom_gamma() {
        let driver = SmartLedsDriver::new(StripWriter::default(), 1);
        let mut renderer = Renderer::with_gamma(driver, NoPause, 1.0);

        renderer.write(Rgb::new(128, 64, 32)).unwrap();

        assert_eq!(renderer.driver().frame(), [Rgb::new(128, 64, 32)]);
        assert!((renderer.gamma().gamma() - 1.0).abs() < f32::EPSILON);
    }
}
