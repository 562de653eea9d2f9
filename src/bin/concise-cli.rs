use clap::{arg, crate_version, Command};
use concise::ConciseSet;
use std::io::{BufRead, Write};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let long_help = "Examples:
---------
Stats:    `concise-cli stats -i my_integers.txt`
Op:       `concise-cli op --op and -a left.txt -b right.txt -o result.txt`
Dump:     `concise-cli dump -i my_integers.txt -o my_set.hex`";

    let ops = ["and", "or", "xor", "andnot"];

    let mut main_cmd = Command::new("concise-cli")
        .about("Explore a CONCISE compressed integer set from the command line")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("stats")
            .arg(arg!(-i --input <PATH> "newline-separated integers").required(true))
            .about("print cardinality, word count, and compression ratios"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("op")
            .arg(arg!(--op <OP> "boolean operator").value_parser(ops).required(true))
            .arg(arg!(-a --left <PATH> "left operand").required(true))
            .arg(arg!(-b --right <PATH> "right operand").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("run a boolean operator over two sets, one member per output line"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("dump")
            .arg(arg!(-i --input <PATH> "newline-separated integers").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .about("persist the parsed set to the hex flat-file format"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("stats") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let set = read_set(path_in)?;
        log::debug!("stats: {} members, {} words", set.len(), set.word_count());
        println!("cardinality: {}", set.len());
        println!("word count: {}", set.word_count());
        println!("bitmap compression ratio: {:.4}", set.bitmap_compression_ratio());
        println!("collection compression ratio: {:.4}", set.collection_compression_ratio());
    }

    if let Some(cmd) = matches.subcommand_matches("op") {
        let op = cmd.get_one::<String>("op").expect(RCH);
        let path_a = cmd.get_one::<String>("left").expect(RCH);
        let path_b = cmd.get_one::<String>("right").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let a = read_set(path_a)?;
        let b = read_set(path_b)?;
        let result = match op.as_str() {
            "and" => a.intersection(&b),
            "or" => a.union(&b),
            "xor" => a.symmetric_difference(&b),
            "andnot" => a.difference(&b),
            _ => {
                eprintln!("{op} not supported");
                return Err(Box::new(std::fmt::Error));
            }
        };
        log::debug!("op {op}: {} -> {} members", a.len(), result.len());
        write_members(path_out, &result)?;
    }

    if let Some(cmd) = matches.subcommand_matches("dump") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let set = read_set(path_in)?;
        let encoded = concise::persist::to_hex(&set);
        std::fs::write(path_out, encoded)?;
    }

    Ok(())
}

fn read_set(path: &str) -> Result<ConciseSet, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        values.push(trimmed.parse::<i32>()?);
    }
    Ok(ConciseSet::from_collection(values)?)
}

fn write_members(path: &str, set: &ConciseSet) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    for value in set.iter() {
        writeln!(out, "{}", value?)?;
    }
    Ok(())
}
