use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use robin_hash::GrowthPolicy;
use robin_hash::HashTable;
use robin_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Maximum load factor, clamped to at most 1.0.
    #[arg(short = 'l', long = "load_factor", default_value_t = 0.5)]
    load_factor: f32,

    /// Grow through the prime table instead of doubling.
    #[arg(long)]
    prime: bool,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();
    let policy = if args.prime {
        GrowthPolicy::Prime
    } else {
        GrowthPolicy::PowerOfTwo
    };

    println!(
        "Creating {policy:?} HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<u64> = HashTable::with_capacity_and_policy(args.target_capacity, policy);
    table.set_max_load_factor(args.load_factor);

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 values...");

    let num_values = (table.capacity() as f64 * f64::from(table.max_load_factor())) as usize;
    let mut num_failures = 0;
    for i in 0..num_values {
        let value = i as u64;
        match table.try_entry(hash_u64(value), |&v| v == value) {
            Ok(Entry::Vacant(entry)) => {
                entry.insert(value);
            }
            Ok(Entry::Occupied(_)) => {
                panic!("Value already exists in table: {}", value);
            }
            Err(_) => num_failures += 1,
        }
    }

    println!("Inserted {} values into table", table.len());
    println!("Final load factor: {:.2}%", table.load_factor() * 100.0);

    table.probe_histogram().print();
    table.debug_stats().print();
    println!(
        "Number of failed try_entry attempts: {} ({:.02}%)",
        num_failures,
        num_failures as f64 / num_values.max(1) as f64 * 100.0
    );

    println!("Removing every other value...");
    for i in (0..num_values).step_by(2) {
        let value = i as u64;
        table.remove(hash_u64(value), |&v| v == value);
    }

    table.probe_histogram().print();
    table.debug_stats().print();
}
