use clap::Parser;
use lin_hash::HashMap;
use lin_hash::ResizePolicy;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: u64,

    #[arg(short = 'l', long = "max_load_percent", default_value_t = 50)]
    max_load_percent: usize,

    #[arg(short = 's', long = "shrink_divisor", default_value_t = 8)]
    shrink_divisor: usize,

    /// Percentage of entries to remove through a cursor after filling.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 75)]
    remove_percent: u64,
}

fn main() {
    let args = Args::parse();

    let policy = match ResizePolicy::new(args.max_load_percent, args.shrink_divisor) {
        Ok(policy) => policy,
        Err(err) => {
            eprintln!("invalid resize policy: {err}");
            std::process::exit(2);
        }
    };

    let mut map: HashMap<u64, u64> =
        HashMap::with_capacity_policy_and_hasher(0, policy, Default::default());

    println!(
        "Filling map with {} entries (max load {}%, shrink at 1/{})...",
        args.entries, args.max_load_percent, args.shrink_divisor
    );
    for key in 0..args.entries {
        map.insert(key, key);
    }

    println!("Inserted {} values, capacity {}", map.len(), map.capacity());
    println!(
        "Final load factor: {:.2}%",
        (map.len() as f64 / map.capacity() as f64) * 100.0
    );
    map.probe_histogram().print();
    map.debug_stats().print();

    let mut removed = 0;
    let mut entries = map.entries();
    let mut cursor = entries.cursor();
    while let Some(entry) = cursor.next() {
        if entry.key() % 100 < args.remove_percent && cursor.remove().is_ok() {
            removed += 1;
        }
    }

    let remaining = entries.len();

    println!();
    println!(
        "Removed {} entries through a cursor, {} remain, capacity {}",
        removed,
        remaining,
        map.capacity()
    );
    map.probe_histogram().print();
    map.debug_stats().print();
}
