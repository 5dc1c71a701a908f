//! Command-line front end for document comparison and extraction anchoring.
//!
//! Documents are JSON arrays of character boxes; extraction passes are a
//! JSON array of arrays of raw field values. Results are printed as JSON on
//! stdout.

use contract_anchor::{
    anchor_extractions, compare_documents, AnchorOptions, CharBox, CompareOptions, OcrDocument,
    RawExtraction, Result,
};
use std::fs::File;
use std::io::BufReader;
use std::process;

const USAGE: &str = "usage:
  anchor compare <doc_a.json> <doc_b.json>
  anchor anchor <doc.json> <passes.json>

<doc.json>    JSON array of character boxes:
              [{\"page\": 1, \"ch\": \"甲\", \"bbox\": [x0, y0, x1, y1], \"category\": \"text\"}, ...]
<passes.json> JSON array of passes, each an array of raw extractions:
              [[{\"field_id\": \"party_a\", \"value\": \"...\", \"confidence\": 0.9}], ...]";

fn load_document(path: &str) -> Result<OcrDocument> {
    let reader = BufReader::new(File::open(path)?);
    let boxes: Vec<CharBox> = serde_json::from_reader(reader)?;
    Ok(OcrDocument::new(boxes))
}

fn load_passes(path: &str) -> Result<Vec<Vec<RawExtraction>>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn run(args: &[String]) -> Result<()> {
    match args {
        [cmd, path_a, path_b] if cmd == "compare" => {
            let doc_a = load_document(path_a)?;
            let doc_b = load_document(path_b)?;
            let blocks = compare_documents(&doc_a, &doc_b, &CompareOptions::default())?;
            println!("{}", serde_json::to_string_pretty(&blocks)?);
            Ok(())
        }
        [cmd, doc_path, passes_path] if cmd == "anchor" => {
            let doc = load_document(doc_path)?;
            let passes = load_passes(passes_path)?;
            let fields = anchor_extractions(&doc, passes, &AnchorOptions::default())?;
            println!("{}", serde_json::to_string_pretty(&fields)?);
            Ok(())
        }
        _ => {
            eprintln!("{USAGE}");
            process::exit(2);
        }
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
