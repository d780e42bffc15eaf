//! Унифицированные трэйты чтения/записи на основе std::io::{BufRead, Write}.
//!
//! Параметр `T` — тип документа: список записей на входе или отчёт на выходе.

use crate::error::Result;
use std::io::{BufRead, Write};

pub trait ReadFormat<T> {
    fn read<R: BufRead>(r: R) -> Result<T>;
}

pub trait WriteFormat<T> {
    fn write<W: Write>(w: W, doc: &T) -> Result<()>;
}
