use crate::error::guard;
use crate::status::coordgen_status_t;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

pub(crate) fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs a stderr log formatter as the global `tracing` subscriber.
///
/// `verbosity` selects the level: 0 = warn, 1 = info, 2 = debug, 3 or more =
/// trace. If the host process already installed a subscriber, it is kept and
/// the call still succeeds.
#[unsafe(no_mangle)]
pub extern "C" fn coordgen_enable_logging(verbosity: u8) -> coordgen_status_t {
    guard(|| {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
            .compact();

        let installed = tracing_subscriber::registry()
            .with(level_for(verbosity))
            .with(stderr_layer)
            .try_init();
        if installed.is_err() {
            debug!("A global tracing subscriber is already installed; keeping it.");
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::coordgen_generate_coordinates;
    use serial_test::serial;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(3), LevelFilter::TRACE);
        assert_eq!(level_for(u8::MAX), LevelFilter::TRACE);
    }

    #[test]
    #[serial]
    fn enabling_logging_twice_still_succeeds() {
        assert_eq!(
            coordgen_enable_logging(2),
            coordgen_status_t::COORDGEN_STATUS_OK
        );
        assert_eq!(
            coordgen_enable_logging(0),
            coordgen_status_t::COORDGEN_STATUS_OK
        );
    }

    #[test]
    #[serial]
    fn generation_emits_log_events() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let atoms = [7u8, 6];
        let bonds = [0u16, 1, 1];
        let mut coords = [0.0f32; 4];
        let status = tracing::subscriber::with_default(subscriber, || unsafe {
            coordgen_generate_coordinates(2, atoms.as_ptr(), 1, bonds.as_ptr(), coords.as_mut_ptr(), 4)
        });

        assert_eq!(status, coordgen_status_t::COORDGEN_STATUS_OK);
        let logs = buffer.contents();
        assert!(logs.contains("Coordinates written to caller buffer."));
        assert!(logs.contains("Layout finished"));
    }
}
