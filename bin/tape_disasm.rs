use anyhow::{Context, Result, anyhow};
use std::{env, fs};
use tapescript::bytecode::{Bytecode, disassemble};

fn main() -> Result<()> {
    let input = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("no input file provided"))?;
    let data = fs::read(&input).with_context(|| format!("reading {input}"))?;
    let bytecode = Bytecode::from_bytes(data);
    let listing = disassemble(&bytecode).with_context(|| format!("decoding {input}"))?;

    println!(
        "{input}: {} bytes, {} instructions",
        bytecode.len(),
        listing.len()
    );
    for line in &listing {
        println!("  {line}");
    }

    Ok(())
}
