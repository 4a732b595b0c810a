//! # Seed Data Generator
//!
//! Populates the database with a demo floor plan and menu for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./mesa.db
//! cargo run -p mesa-db --bin seed
//!
//! # Specify database path and number of tables
//! cargo run -p mesa-db --bin seed -- --db ./data/mesa.db --tables 24
//! ```
//!
//! ## Generated Data
//! - Tables numbered 1..=N with capacities cycling 2, 4, 4, 6
//! - Modifiers (extra cheese, no onions, ...)
//! - Categories with default printer roles (drinks → bar)
//! - Menu items under each category
//!
//! Running twice is harmless: rows whose unique key already exists are
//! skipped.

use std::env;

use mesa_db::{
    CategoryDraft, Database, DbConfig, DbError, MenuItemDraft, ModifierDraft, TableDraft,
};

/// Modifiers: (name, price delta in cents)
const MODIFIERS: &[(&str, i64)] = &[
    ("Extra cheese", 120),
    ("Bacon", 200),
    ("No onions", 0),
    ("Gluten free", 150),
    ("Large", 100),
    ("No ice", 0),
];

/// Categories: (name, icon, printer role, items as (name, price cents, modifier names))
#[allow(clippy::type_complexity)]
const MENU: &[(&str, &str, &str, &[(&str, i64, &[&str])])] = &[
    (
        "Starters",
        "salad",
        "kitchen",
        &[
            ("Bruschetta", 750, &["Gluten free"]),
            ("Soup of the day", 650, &[]),
            ("Calamari", 950, &[]),
        ],
    ),
    (
        "Mains",
        "utensils",
        "kitchen",
        &[
            ("Burger", 1210, &["Extra cheese", "Bacon", "No onions"]),
            ("Margherita", 1100, &["Extra cheese", "Gluten free"]),
            ("Steak frites", 2450, &[]),
            ("Risotto", 1650, &[]),
        ],
    ),
    (
        "Desserts",
        "cake",
        "kitchen",
        &[("Tiramisu", 700, &[]), ("Affogato", 550, &[])],
    ),
    (
        "Drinks",
        "glass",
        "bar",
        &[
            ("Lager", 550, &["Large"]),
            ("House red", 800, &[]),
            ("Lemonade", 400, &["No ice", "Large"]),
            ("Espresso", 300, &[]),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = "./mesa.db".to_string();
    let mut table_count: i64 = 12;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            "--tables" if i + 1 < args.len() => {
                table_count = args[i + 1].parse()?;
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: seed [--db PATH] [--tables N]");
                std::process::exit(2);
            }
        }
    }

    println!("Mesa POS seed");
    println!("  database: {}", db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;

    // Tables
    let mut created = 0;
    for number in 1..=table_count {
        let capacity = [2, 4, 4, 6][(number as usize - 1) % 4];
        match db.tables().insert(&TableDraft { number, capacity }).await {
            Ok(_) => created += 1,
            Err(DbError::UniqueViolation { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }
    println!("✓ Tables: {} created", created);

    // Modifiers
    for (name, delta) in MODIFIERS {
        let draft = ModifierDraft {
            name: name.to_string(),
            price_delta_cents: *delta,
        };
        match db.modifiers().insert(&draft).await {
            Ok(_) | Err(DbError::UniqueViolation { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }
    let modifiers = db.modifiers().list().await?;
    println!("✓ Modifiers: {}", modifiers.len());

    // Categories and items
    let roles = db.printer_roles().list().await?;
    let mut item_count = 0;
    for (category_name, icon, role_name, items) in MENU {
        if db.categories().name_taken(category_name, None).await? {
            continue;
        }

        let role_id = roles
            .iter()
            .find(|r| r.name == *role_name)
            .map(|r| r.id.clone());

        let category = db
            .categories()
            .insert(&CategoryDraft {
                name: category_name.to_string(),
                icon: Some(icon.to_string()),
                default_printer_role_id: role_id,
            })
            .await?;

        for (item_name, price_cents, modifier_names) in *items {
            let modifier_ids = modifiers
                .iter()
                .filter(|m| modifier_names.contains(&m.name.as_str()))
                .map(|m| m.id.clone())
                .collect();

            db.menu_items()
                .insert(&MenuItemDraft {
                    name: item_name.to_string(),
                    description: None,
                    price_cents: *price_cents,
                    category_id: category.id.clone(),
                    printer_role_id: None,
                    is_available: true,
                    modifier_ids,
                })
                .await?;
            item_count += 1;
        }
    }
    println!("✓ Menu items: {} created", item_count);

    db.close().await;
    println!("✓ Seed complete!");

    Ok(())
}
