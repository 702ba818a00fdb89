use entities::ENTITIES;
use std::io::Write;
use std::{env, path::PathBuf};

fn main() {
    let out_dir: PathBuf = env::var("OUT_DIR").unwrap().parse().unwrap();

    // The runtime lookup sees bare entity names ("amp" for "&amp;") and only
    // recognises the semicolon-terminated forms, so keep just those entries,
    // stripped of their "&"/";" framing.  The source table interleaves case
    // variants; sort so the lookup can binary search.
    let mut table = ENTITIES
        .iter()
        .filter(|e| e.entity.starts_with('&') && e.entity.ends_with(';'))
        .map(|e| (&e.entity[1..e.entity.len() - 1], e.characters))
        .collect::<Vec<_>>();
    table.sort_by_key(|&(name, _)| name);

    let out = std::fs::File::create(out_dir.join("entity_table.rs")).unwrap();
    let mut bw = std::io::BufWriter::new(out);
    writeln!(bw, "static ENTITY_TABLE: &[(&str, &str); {}] = &[", table.len()).unwrap();
    for (name, characters) in table {
        writeln!(bw, "    ({:?}, {:?}),", name, characters).unwrap();
    }
    writeln!(bw, "];").unwrap();
}
