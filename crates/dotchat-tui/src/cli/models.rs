// ABOUTME: Lists the model catalog
// ABOUTME: Plain table by default, JSON with --json

use anyhow::Result;
use dotchat_core::models::{catalog, Model};

fn table(models: &[Model], current: &str) -> String {
    let width = models.iter().map(|m| m.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for model in models {
        let mark = if model.id == current { '*' } else { ' ' };
        let description = model.description.as_deref().unwrap_or("");
        out.push_str(&format!(
            "{mark} {:<width$}  {}  {}\n",
            model.id, model.name, description
        ));
    }
    out
}

pub fn run(current: &str, json: bool) -> Result<()> {
    let models = catalog();
    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        print!("{}", table(&models, current));
    }
    Ok(())
}
