use payagelib::{
    formats::{csv::Csv, text::Text},
    resolve::{resolve_obligations, ObligationRecord},
    summarize,
    traits::{ReadFormat, WriteFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: CSV заказов -> текстовая сводка на сегодня (stdin -> stdout)
    let records: Vec<ObligationRecord> = Csv::read(std::io::BufReader::new(std::io::stdin()))?;
    let today = chrono::Local::now().date_naive();
    Text::write(std::io::stdout(), &summarize(&resolve_obligations(&records, &[]), today))?;
    Ok(())
}
