//! Search for a food and print its basic report.
//!
//! Run with: `USDA_API_KEY=your-key cargo run --example food_search -- cheddar`

use std::time::Duration;
use usda::{Client, Context};

#[tokio::main]
async fn main() -> Result<(), usda::Error> {
    let api_key = std::env::var("USDA_API_KEY").expect("USDA_API_KEY must be set");
    let query = std::env::args().nth(1).unwrap_or_else(|| "cheddar".into());

    let client = Client::builder(api_key).build()?;
    let ctx = Context::new().with_timeout(Duration::from_secs(20));

    let results = client.food_name_search(&ctx, &query).await?;
    println!("{} matches for {:?}", results.list.total, results.list.q);

    let Some(first) = results.list.item.first() else {
        return Ok(());
    };
    println!("Top hit: {} ({})", first.name, first.ndbno);

    let report = client.basic_food_report(&ctx, &first.ndbno).await?;
    for entry in report.foods {
        match (entry.food, entry.error) {
            (Some(food), _) => {
                for nutrient in food.nutrients {
                    println!("  {:<40} {} {}", nutrient.name, nutrient.value, nutrient.unit);
                }
            }
            (None, Some(error)) => println!("  error: {}", error),
            (None, None) => {}
        }
    }

    Ok(())
}
