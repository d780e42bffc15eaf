use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use payagelib::{
    error::{PayageError, Result},
    expiry::{self, expiry_alerts},
    formats::{csv::Csv, json::Json, text::Text, xml::SimpleXml},
    model::{Obligation, StockBatch},
    reminders::reminders,
    resolve::{resolve_obligations, ObligationRecord, PaymentRecord},
    traits::{ReadFormat, WriteFormat},
    AgingCalculator, BucketBounds,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "payage=info,payagelib=warn";

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InFmt {
    Csv,
    Xml,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutFmt {
    Text,
    Csv,
    Xml,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "payage", version, about = "Кредиторка по срокам, напоминания, сроки годности")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Входной файл (по умолчанию stdin)
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Дата отчёта, YYYY-MM-DD (по умолчанию сегодня)
    #[arg(long = "as-of")]
    as_of: Option<NaiveDate>,

    /// Формат выхода
    #[arg(long = "out-format", value_enum, default_value = "text")]
    out_format: OutFmt,
}

#[derive(Args, Debug)]
struct Ledger {
    /// Журнал платежей (CSV)
    #[arg(long = "payments")]
    payments: Option<String>,

    /// Формат входа
    #[arg(long = "in-format", value_enum, default_value = "csv")]
    in_format: InFmt,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Сводка задолженности по корзинам просрочки
    Summary {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        ledger: Ledger,
        /// Верхние границы корзин в днях
        #[arg(long = "bounds", value_delimiter = ',', default_values_t = BucketBounds::AGING)]
        bounds: Vec<i64>,
    },
    /// Просроченные и ближайшие платежи
    Reminders {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        ledger: Ledger,
        /// Горизонт напоминаний в днях
        #[arg(long = "window", default_value_t = 7)]
        window: i64,
    },
    /// Партии с истекающим сроком годности
    Expiry {
        #[command(flatten)]
        io: IoArgs,
        /// Верхние границы корзин в днях
        #[arg(long = "bounds", value_delimiter = ',', default_values_t = expiry::EXPIRY_BOUNDS)]
        bounds: Vec<i64>,
    },
}

fn open_input(path: Option<&str>) -> Result<Box<dyn BufRead>> {
    let reader: Box<dyn io::Read> = match path {
        Some(p) => Box::new(File::open(p)?),
        None => Box::new(io::stdin()),
    };
    Ok(Box::new(BufReader::new(reader)))
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(File::create(p)?),
        None => Box::new(io::stdout()),
    })
}

fn load_obligations(args: &IoArgs, ledger: &Ledger) -> Result<Vec<Obligation>> {
    let br = open_input(args.input.as_deref())?;
    let records: Vec<ObligationRecord> = match ledger.in_format {
        InFmt::Csv => Csv::read(br),
        InFmt::Xml => SimpleXml::read(br),
    }?;

    let payments: Vec<PaymentRecord> = match &ledger.payments {
        Some(p) => Csv::read(BufReader::new(File::open(p)?))?,
        None => Vec::new(),
    };
    tracing::info!(records = records.len(), payments = payments.len(), "ledger loaded");

    Ok(resolve_obligations(&records, &payments))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Summary { io: args, ledger, bounds } => {
            let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
            let calc = AgingCalculator::new(BucketBounds::new(bounds)?);
            let obligations = load_obligations(&args, &ledger)?;
            let summary = calc.summarize(&obligations, as_of);

            let mut w = open_output(args.output.as_deref())?;
            match args.out_format {
                OutFmt::Text => Text::write(&mut w, &summary),
                OutFmt::Csv => Csv::write(&mut w, &summary),
                OutFmt::Xml => SimpleXml::write(&mut w, &summary),
                OutFmt::Json => Json::write(&mut w, &summary),
            }?;
            w.flush().map_err(PayageError::from)
        }
        Command::Reminders { io: args, ledger, window } => {
            let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
            let obligations = load_obligations(&args, &ledger)?;
            let list = reminders(&obligations, as_of, window)?;

            let mut w = open_output(args.output.as_deref())?;
            match args.out_format {
                OutFmt::Text => Text::write(&mut w, &list),
                OutFmt::Csv => Csv::write(&mut w, &list),
                OutFmt::Json => Json::write(&mut w, &list),
                OutFmt::Xml => Err(PayageError::Unsupported("reminders as XML")),
            }?;
            w.flush().map_err(PayageError::from)
        }
        Command::Expiry { io: args, bounds } => {
            let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
            let bounds = BucketBounds::new(bounds)?;
            let batches: Vec<StockBatch> = Csv::read(open_input(args.input.as_deref())?)?;
            let report = expiry_alerts(&batches, as_of, &bounds);

            let mut w = open_output(args.output.as_deref())?;
            match args.out_format {
                OutFmt::Text => Text::write(&mut w, &report),
                OutFmt::Json => Json::write(&mut w, &report),
                OutFmt::Csv | OutFmt::Xml => Err(PayageError::Unsupported("expiry report as CSV/XML")),
            }?;
            w.flush().map_err(PayageError::from)
        }
    }
}
