use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_ngram_core::{Engine, NGramError, Outcome};

const CORPUS: &str = "The cat sat on the mat. The cat ran to the door. \
	The dog sat on the rug. The dog ran to the cat.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Models are stored as "<name>.bin" files in this directory (created if missing)
    let engine = Engine::open("./models")?;

    // Train a trigram model, or reuse the one left by a previous run
    match engine.train("pets", CORPUS, 3) {
        Ok(model) => println!("Trained '{}' with {} contexts", model.name(), model.table().len()),
        Err(NGramError::NameAlreadyExists(name)) => println!("Model '{name}' already exists, reusing it"),
        Err(e) => return Err(e.into()),
    }

    // Orders below 2 are rejected
    match engine.train("broken", CORPUS, 1) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Tuning adds counts; an explicit n must match the model
    match engine.tune("pets", "The bird sat on the cat.", Some(2)) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // The start text needs at least n - 1 tokens
    match engine.generate("pets", 5, Some("cat"), StdRng::seed_from_u64(0)) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Same seed, same text
    for seed in 0..5 {
        let generation = engine.generate("pets", 12, Some("The cat"), StdRng::seed_from_u64(seed))?;
        match generation.outcome() {
            Outcome::Completed => println!("Generated {}: {}", seed + 1, generation.text()),
            Outcome::UnseenContext(context) => println!(
                "Generated {} (stopped early on {:?}): {}",
                seed + 1,
                context,
                generation.text()
            ),
        }
    }

    // Without a start text, generation begins from a random known context
    let generation = engine.generate("pets", 8, None, StdRng::seed_from_u64(99))?;
    println!("Random start: {}", generation.text());

    for name in engine.list()? {
        let summary = engine.info(&name)?;
        println!("{name}: n = {}, {} contexts, {} observations", summary.order, summary.contexts, summary.observations);
    }

    Ok(())
}
