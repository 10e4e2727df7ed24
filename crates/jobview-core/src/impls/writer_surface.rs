//! WriterSurface - `io::Write` へ書き出すマウントポイント
//!
//! 端末向けには、前回の出力をカーソル移動で巻き戻してから上書きする。

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::ports::{DisplaySurface, SurfaceError};

const CLEAR_TO_END: &str = "\x1b[0J";

fn move_cursor_up(lines: usize) -> String {
    format!("\x1b[{lines}A\r")
}

struct WriterState<W> {
    writer: W,
    /// Lines written by the previous call (only tracked when rewinding).
    previous_lines: usize,
}

/// Display surface backed by any writer (stdout, a file, a `Vec<u8>`).
///
/// With `rewind` enabled, each write first moves the cursor back over the
/// previous output and clears it, so a terminal shows only the latest
/// rendering. Without it, renderings are simply appended.
pub struct WriterSurface<W: Write + Send> {
    state: Mutex<WriterState<W>>,
    rewind: bool,
}

impl<W: Write + Send> WriterSurface<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(WriterState {
                writer,
                previous_lines: 0,
            }),
            rewind: false,
        }
    }

    pub fn with_rewind(mut self, rewind: bool) -> Self {
        self.rewind = rewind;
        self
    }

    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }
}

impl<W: Write> WriterState<W> {
    fn write_rendering(&mut self, content: &str, rewind: bool) -> io::Result<()> {
        if rewind && self.previous_lines > 0 {
            let up = move_cursor_up(self.previous_lines);
            self.writer.write_all(up.as_bytes())?;
            self.writer.write_all(CLEAR_TO_END.as_bytes())?;
        }
        self.writer.write_all(content.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write + Send> DisplaySurface for WriterSurface<W> {
    fn replace_contents(&self, content: &str) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        match state.write_rendering(content, self.rewind) {
            Ok(()) => {
                if self.rewind {
                    state.previous_lines = content.lines().count().max(1);
                }
                Ok(())
            }
            Err(e) => {
                // What reached the terminal is unknown; never rewind over it.
                state.previous_lines = 0;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn appends_each_rendering_without_rewind() {
        let surface = WriterSurface::new(Vec::new());
        surface.replace_contents("a").unwrap();
        surface.replace_contents("b\nc").unwrap();

        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "a\nb\nc\n");
    }

    #[test]
    fn rewinds_over_previous_lines() {
        let surface = WriterSurface::new(Vec::new()).with_rewind(true);
        surface.replace_contents("one\ntwo").unwrap();
        surface.replace_contents("three").unwrap();

        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "one\ntwo\n\x1b[2A\r\x1b[0Jthree\n");
    }

    /// Accepts writes until `broken` is raised.
    struct FlakyWriter {
        out: Vec<u8>,
        broken: Arc<AtomicBool>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_stops_the_next_rewind() {
        let broken = Arc::new(AtomicBool::new(false));
        let writer = FlakyWriter {
            out: Vec::new(),
            broken: Arc::clone(&broken),
        };
        let surface = WriterSurface::new(writer).with_rewind(true);

        surface.replace_contents("one\ntwo").unwrap();
        broken.store(true, Ordering::SeqCst);
        assert!(surface.replace_contents("lost").is_err());
        broken.store(false, Ordering::SeqCst);
        surface.replace_contents("three").unwrap();

        let out = String::from_utf8(surface.into_inner().out).unwrap();
        assert_eq!(out, "one\ntwo\nthree\n");
    }
}
