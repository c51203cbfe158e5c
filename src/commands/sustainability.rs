use crate::commands::render_json;
use crate::sustainability::{compute_sustainability, SustainabilityInputs};
use anyhow::Result;
use log::info;

pub fn run(inputs: &SustainabilityInputs, pretty: bool) -> Result<()> {
    let result = compute_sustainability(inputs);
    info!(
        "Sustainability score {} ({})",
        result.score, result.label
    );
    println!("{}", render_json(&result, pretty)?);
    Ok(())
}
