//! Generates a demo product CSV for exercising the importer.

use anyhow::Result;
use rand::Rng;

fn main() -> Result<()> {
    env_logger::init();
    // Args: path rows [--with-errors]
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "productos_demo.csv".into());
    let rows = args
        .get(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1000);
    let with_errors = args.iter().any(|a| a == "--with-errors");

    println!("Seeding {path} with {rows} rows (errors: {with_errors})...");

    let mut rng = rand::thread_rng();
    let mut w = csv::Writer::from_path(&path)?;
    w.write_record([
        "Nombre",
        "SKU",
        "Precio",
        "Stock",
        "Categoría",
        "Descripción",
        "Imagen",
        "Activo",
    ])?;

    let adjectives = ["Vintage", "Pro", "Clásico", "Premium", "Básico", "Deluxe"];
    let nouns = [
        "Smartphone",
        "Auriculares",
        "Camiseta",
        "Zapatillas",
        "Mochila",
        "Lámpara",
        "Teclado",
        "Cafetera",
    ];
    let categories = ["Electrónicos", "Moda", "Hogar", "Deportes"];

    let mut error_rows = 0usize;
    for i in 0..rows {
        let noun = nouns[rng.gen_range(0..nouns.len())];
        let adj = adjectives[rng.gen_range(0..adjectives.len())];
        let mut name = format!("{noun} {adj} {i}");
        let sku = format!("{}-{i:05}", &noun[..3].to_uppercase());
        let mut price = format!("{:.2}", rng.gen_range(5.0..1500.0f64));
        let mut stock = rng.gen_range(0..500i32).to_string();
        let category = categories[rng.gen_range(0..categories.len())];
        let description = format!("{noun} {adj} de la colección {}", 2020 + (i % 6));
        let image = format!("https://cdn.example.com/p/{sku}.jpg");
        let active = if rng.gen_bool(0.9) { "sí" } else { "no" };

        // Roughly 5% of rows get one seeded defect.
        if with_errors && rng.gen_bool(0.05) {
            error_rows += 1;
            match rng.gen_range(0..3) {
                0 => name.clear(),
                1 => price = "gratis".into(),
                _ => stock = "-5".into(),
            }
        }

        w.write_record([
            name.as_str(),
            sku.as_str(),
            price.as_str(),
            stock.as_str(),
            category,
            description.as_str(),
            image.as_str(),
            active,
        ])?;
    }
    w.flush()?;

    println!("Seeding complete ({error_rows} rows with seeded errors).");
    Ok(())
}
