use rollscope_core::Registry;

pub fn run() {
    let registry = Registry::builtin();

    println!("{} registered algorithm(s):\n", registry.len());
    println!(
        "  {:<12} {:<11} {:>5} {:>7}  Description",
        "Name", "Family", "Bits", "Window"
    );
    for algo in registry.iter() {
        let info = algo.info();
        println!(
            "  {:<12} {:<11} {:>5} {:>7}  {}",
            info.name,
            info.family.to_string(),
            info.digest_bits,
            info.window_size,
            info.description
        );
        if let Some(hazard) = info.hazard {
            println!("  {:<12} hazard: {hazard} (skipped by --all unless --include-hazardous)", "");
        }
    }
}
