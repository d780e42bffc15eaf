//! JSON: любой отчёт, реализующий `Serialize`.

use crate::error::Result;
use serde::Serialize;
use std::io::Write;

pub struct Json;

impl<T: Serialize> crate::traits::WriteFormat<T> for Json {
    fn write<W: Write>(mut w: W, doc: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, doc)?;
        w.write_all(b"\n")?;
        Ok(())
    }
}
