use clap::Parser;
use std::{fs::File, io::BufReader, path::Path, str::FromStr};
use treerule::{Checker, Error, MemoryLexicon, Sentence, Tables};

#[derive(Clone)]
enum Format {
    Text,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            x => Err(format!("unknown format '{}', expected 'text' or 'json'", x)),
        }
    }
}

#[derive(Parser)]
#[clap(
    version = "1.0",
    author = "Benjamin Minixhofer <bminixhofer@gmail.com>"
)]
struct Opts {
    /// JSON array of parsed sentences.
    input: String,
    /// Lexical tables, as JSON if the extension is `.json`, else as binary.
    #[clap(long, short)]
    tables: Option<String>,
    /// JSON array of word forms.
    #[clap(long, short)]
    lexicon: Option<String>,
    #[clap(long, short, default_value = "text")]
    format: Format,
}

fn load_tables(path: &str) -> Result<Tables, Error> {
    if Path::new(path).extension().map_or(false, |x| x == "json") {
        Tables::from_json_reader(BufReader::new(File::open(path)?))
    } else {
        Tables::new(path)
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let opts = Opts::parse();

    let tables = match &opts.tables {
        Some(path) => load_tables(path)?,
        None => Tables::default(),
    };
    let lexicon = match &opts.lexicon {
        Some(path) => MemoryLexicon::from_json_reader(BufReader::new(File::open(path)?))?,
        None => MemoryLexicon::default(),
    };
    let checker = Checker::new(tables, lexicon);

    let sentences: Vec<Sentence> =
        serde_json::from_reader(BufReader::new(File::open(&opts.input)?))?;

    for sentence in &sentences {
        let annotations = checker.annotate(sentence);

        match opts.format {
            Format::Text => {
                println!("{}", sentence.text());
                for annotation in &annotations {
                    println!("{}", annotation);
                }
                println!();
            }
            Format::Json => println!(
                "{}",
                serde_json::to_string(&serde_json::json!({
                    "text": sentence.text(),
                    "annotations": annotations,
                }))?
            ),
        }
    }

    Ok(())
}
