// Tests for SimulationEngine run loops and observers
#[cfg(test)]
mod tests {
    use crate::core::{
        belt::{Belt, ScriptedFeed},
        errors::FactoryError,
        execution::simulation_engine::{SimulationEngine, SimulationObserver},
        factory::Factory,
        types::Item,
    };
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;
    use std::sync::{Mutex, Once};

    static CAPTURED: Mutex<Vec<(log::Level, String)>> = Mutex::new(Vec::new());

    struct CapturingLogger;

    impl log::Log for CapturingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut captured) = CAPTURED.lock() {
                captured.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger;

    fn install_logger() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Debug);
        });
    }

    #[derive(Default)]
    struct Recorded {
        ticks: Vec<(u64, Item)>,
        completed: usize,
    }

    struct RecordingObserver(Rc<RefCell<Recorded>>);

    impl SimulationObserver for RecordingObserver {
        fn on_tick(&mut self, tick: u64, fallen: Item, _factory: &Factory) {
            self.0.borrow_mut().ticks.push((tick, fallen));
        }

        fn on_run_complete(&mut self, _factory: &Factory) {
            self.0.borrow_mut().completed += 1;
        }
    }

    fn engine_with_recorder(max_ticks: Option<u64>) -> (SimulationEngine, Rc<RefCell<Recorded>>) {
        let factory = Factory::new(3).unwrap();
        let mut engine = SimulationEngine::new(factory, max_ticks);
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        engine.add_observer(Box::new(RecordingObserver(recorded.clone())));
        (engine, recorded)
    }

    #[test]
    fn test_step_advances_one_tick() -> Result<(), FactoryError> {
        let (mut engine, recorded) = engine_with_recorder(None);
        engine.step()?;
        assert_eq!(engine.current_tick(), 1);
        assert_eq!(recorded.borrow().ticks.len(), 1);
        assert_eq!(recorded.borrow().ticks[0].0, 1);
        Ok(())
    }

    #[test]
    fn test_run_with_max_ticks() -> Result<(), FactoryError> {
        let (mut engine, recorded) = engine_with_recorder(Some(10));
        let final_tick = engine.run()?;

        assert_eq!(final_tick, 10);
        assert_eq!(engine.factory().output().len(), 10);
        let recorded = recorded.borrow();
        let ticks: Vec<u64> = recorded.ticks.iter().map(|(tick, _)| *tick).collect();
        assert_eq!(ticks, (1..=10).collect::<Vec<_>>());
        assert_eq!(recorded.completed, 1);
        Ok(())
    }

    #[test]
    fn test_run_without_limit_does_nothing() -> Result<(), FactoryError> {
        let (mut engine, _) = engine_with_recorder(None);
        assert_eq!(engine.run()?, 0);
        Ok(())
    }

    #[test]
    fn test_observer_sees_fallen_items() -> Result<(), FactoryError> {
        let belt = Belt::with_feed(Box::new(ScriptedFeed::new(vec![Item::Product])));
        let factory = Factory::with_belt(belt, 1)?;
        let mut engine = SimulationEngine::new(factory, Some(2));
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        engine.add_observer(Box::new(RecordingObserver(recorded.clone())));
        engine.run()?;

        assert_eq!(
            recorded.borrow().ticks,
            vec![(1, Item::Empty), (2, Item::Product)]
        );
        Ok(())
    }

    #[test]
    fn test_stepped_run_stops_on_non_empty_input() -> Result<(), FactoryError> {
        let (mut engine, recorded) = engine_with_recorder(None);
        let input = Cursor::new("\n\nc\n\n");
        let mut output = Vec::new();

        let ticks = engine.run_stepped(input, &mut output)?;

        assert_eq!(ticks, 2);
        assert_eq!(recorded.borrow().completed, 1);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("TOP ROW:").count(), 2);
        assert_eq!(text.matches("Same options as before!").count(), 2);
        assert!(text.starts_with("What do you want to do?"));
        Ok(())
    }

    #[test]
    fn test_stepped_run_stops_at_end_of_input() -> Result<(), FactoryError> {
        let (mut engine, _) = engine_with_recorder(None);
        let mut output = Vec::new();
        let ticks = engine.run_stepped(Cursor::new("\n\r\n"), &mut output)?;
        assert_eq!(ticks, 2);
        Ok(())
    }

    #[test]
    fn test_run_progress_is_logged_below_info() -> Result<(), FactoryError> {
        install_logger();
        let factory = Factory::new(3)?;
        let mut engine = SimulationEngine::new(factory, Some(2));
        engine.run()?;

        let captured = CAPTURED.lock().unwrap();
        let chatty = captured.iter().any(|(level, message)| {
            *level <= log::Level::Info
                && (message.starts_with("Empty belt created") || message.starts_with("Running"))
        });
        assert!(!chatty, "console messages duplicated at info level");
        assert!(captured.iter().any(|(level, message)| {
            *level == log::Level::Debug && message.starts_with("Empty belt created with 3 slot(s)")
        }));
        Ok(())
    }

    #[test]
    fn test_into_factory_keeps_state() -> Result<(), FactoryError> {
        let (mut engine, _) = engine_with_recorder(Some(4));
        engine.run()?;
        let factory = engine.into_factory();
        assert_eq!(factory.ticks(), 4);
        assert_eq!(factory.tally().iter().map(|(_, n)| n).sum::<usize>(), 4);
        Ok(())
    }
}
