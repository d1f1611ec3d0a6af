//! CookCraft command-line client
//!
//! Usage:
//! ```bash
//! # Classify a measurement without signing in
//! cookcraft bmi --weight 154 --height 68 --unit imperial --gender male --age 30
//!
//! # Save it and ask the prediction service for meal ideas
//! cookcraft --email me@example.com bmi --weight 70 --height 175 --gender female --age 24 --save --recommend
//!
//! # Browse history and recipes
//! cookcraft history --limit 10
//! cookcraft recipes --meal-type breakfast --search oats
//! cookcraft analytics --range month --metric protein
//! ```

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use cookcraft_client::{
    config::AppConfig,
    services::{analytics::today_in, recipes, BmiResultStore, MealRecommender},
    state::AppState,
};
use cookcraft_shared::{
    analytics::{moving_average, summarize, NutritionMetric, TimeRange},
    bmi::{gauge_fraction, ActivityLevel, BmiAssessment, Gender},
    models::{BmiRecord, BmiResultQuery, MealType, NewBmiResult},
    types::{PredictRequest, PredictResponse},
    units::{Measurement, UnitSystem},
    validation::{validate_measurement, Credentials},
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "cookcraft",
    version,
    about = "BMI tracking and meal recommendations",
    long_about = "Classifies BMI measurements, keeps a history in Supabase and fetches meal recommendations."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Account e-mail
    #[arg(long, global = true, env = "COOKCRAFT_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "COOKCRAFT_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate and classify a BMI
    Bmi {
        /// Weight in kg (metric) or lb (imperial)
        #[arg(long)]
        weight: String,

        /// Height in cm (metric) or inches (imperial)
        #[arg(long)]
        height: String,

        #[arg(long, default_value = "metric")]
        unit: UnitSystem,

        #[arg(long)]
        gender: Option<Gender>,

        #[arg(long, allow_hyphen_values = true)]
        age: i32,

        #[arg(long, default_value = "moderate")]
        activity: ActivityLevel,

        /// Store the measurement in the history
        #[arg(long)]
        save: bool,

        /// Ask the prediction service for meal recommendations
        #[arg(long)]
        recommend: bool,
    },

    /// List stored measurements, newest first
    History {
        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show the most recent measurement
    Latest,

    /// Delete a stored measurement
    Delete { id: i64 },

    /// Browse the recipe catalogue
    Recipes {
        #[arg(long)]
        meal_type: Option<MealType>,

        /// Match on name or ingredient
        #[arg(long)]
        search: Option<String>,
    },

    /// Nutrition totals and trends
    Analytics {
        #[arg(long, default_value = "week")]
        range: TimeRange,

        #[arg(long, default_value = "calories")]
        metric: NutritionMetric,

        /// IANA time zone used to bucket days
        #[arg(long, default_value = "UTC")]
        tz: Tz,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    debug!(supabase = %config.supabase.url, "Configuration loaded");

    let state = AppState::new(config)?;

    state.supabase.run_then_sign_out(run(&state, cli)).await
}

async fn run(state: &AppState, cli: Cli) -> Result<()> {
    match cli.command {
        Command::Bmi {
            weight,
            height,
            unit,
            gender,
            age,
            activity,
            save,
            recommend,
        } => {
            let measurement = Measurement::new(weight, height, unit);
            validate_measurement(&measurement, Some(age))?;

            let assessment = BmiAssessment::evaluate(&measurement, gender, age, activity);
            print_assessment(&assessment);

            if save {
                sign_in(state, cli.email, cli.password).await?;
                let record = state
                    .bmi
                    .save_result(&NewBmiResult {
                        measured_at: Utc::now(),
                        weight: measurement.weight_value(),
                        height: measurement.height_value(),
                        unit_system: unit,
                        activity,
                        gender,
                        age: Some(age),
                    })
                    .await?;
                println!("Saved as #{} ({})", record.id, record.category);
            }

            if recommend {
                let gender = gender.context("--gender is required for recommendations")?;
                let request = PredictRequest::from_assessment(&assessment, age, gender, activity);
                let response = state.recommender.predict_and_explain(&request).await?;
                print_prediction(&response);
            }
        }
        Command::History { limit, offset } => {
            sign_in(state, cli.email, cli.password).await?;
            let records = state
                .bmi
                .list_results(&BmiResultQuery {
                    limit,
                    offset,
                    ..Default::default()
                })
                .await?;
            if records.is_empty() {
                println!("No measurements yet");
            }
            for record in &records {
                print_record(record);
            }
        }
        Command::Latest => {
            sign_in(state, cli.email, cli.password).await?;
            match state.bmi.latest_result().await? {
                Some(record) => print_record(&record),
                None => println!("No measurements yet"),
            }
        }
        Command::Delete { id } => {
            sign_in(state, cli.email, cli.password).await?;
            state.bmi.delete_result(id).await?;
            println!("Deleted #{}", id);
        }
        Command::Recipes { meal_type, search } => {
            let catalogue = match meal_type {
                Some(meal_type) => {
                    state
                        .recipes
                        .fetch_category_strict(&meal_type.catalogue_file(), meal_type.label(), meal_type)
                        .await?
                }
                None => state.recipes.fetch_all().await,
            };
            let matches = recipes::search(&catalogue, search.as_deref().unwrap_or(""));
            info!(total = catalogue.len(), shown = matches.len(), "Recipes loaded");

            for recipe in matches {
                let ingredients = recipe.ingredients.join(", ");
                match recipe.meal_type.as_deref() {
                    Some(meal_type) => println!("{} [{}]", recipe.name, meal_type),
                    None => println!("{}", recipe.name),
                }
                if !ingredients.is_empty() {
                    println!("    {}", ingredients);
                }
            }
        }
        Command::Analytics { range, metric, tz } => {
            sign_in(state, cli.email, cli.password).await?;
            let (start, end) = range.bounds(today_in(tz));
            let points = state.analytics.nutrition_timeseries(start, end, tz).await?;

            let values: Vec<f64> = points.iter().map(|p| p.value(metric)).collect();
            let trend = moving_average(&values, range.moving_average_window());
            let summary = summarize(&points, metric);

            println!("{} from {} to {}", metric, start, end - Duration::days(1));
            for point in &points {
                println!("  {}  {:>8.1} {}", point.day, point.value(metric), metric.unit());
            }
            println!(
                "Total {:.1} {unit}, average {:.1} {unit}/day, goal met on {}% of days",
                summary.total,
                summary.average,
                summary.adherence_pct,
                unit = metric.unit()
            );
            if let Some(last) = trend.last() {
                println!("{}-day moving average: {:.1}", range.moving_average_window(), last);
            }
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "cookcraft_client=info".into()
        } else {
            "cookcraft_client=debug,cookcraft=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so command output stays pipeable
    if AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

async fn sign_in(state: &AppState, email: Option<String>, password: Option<String>) -> Result<()> {
    let (Some(email), Some(password)) = (email, password) else {
        bail!("--email and --password (or COOKCRAFT_EMAIL / COOKCRAFT_PASSWORD) are required");
    };
    let user = state.supabase.sign_in(&Credentials::new(email, password)).await?;
    debug!(user_id = %user.id, "Authenticated");
    Ok(())
}

fn print_assessment(assessment: &BmiAssessment) {
    let (min, max) = assessment.ideal_weight_range_kg;
    let gauge_width = 30;
    let filled = (gauge_fraction(assessment.bmi) * gauge_width as f64).round() as usize;

    println!("BMI: {:.1}  {}", assessment.bmi, assessment.category);
    println!("[{}{}]", "#".repeat(filled), "-".repeat(gauge_width - filled));
    println!("Ideal weight: {:.1} - {:.1} kg", min, max);
    println!("{}", assessment.category.health_tip());
}

fn print_record(record: &BmiRecord) {
    println!(
        "#{:<6} {}  BMI {:>5.1}  {:<12} {:.1} kg / {:.2} m",
        record.id,
        record.measured_at.format("%Y-%m-%d %H:%M"),
        record.bmi,
        record.category,
        record.weight_kg,
        record.height_m
    );
}

fn print_prediction(response: &PredictResponse) {
    println!("\nPredicted category: {}", response.prediction.bmi_category);
    for (class, p) in response.prediction.sorted_probabilities() {
        println!("  {:<14} {:>5.1}%", class, p * 100.0);
    }

    let features = &response.explanations.local.top_features;
    if !features.is_empty() {
        println!("Top factors:");
        for feature in features {
            println!("  {:<24} {:+.3}", feature.feature, feature.shap_value);
        }
    }

    println!("\n{}", response.meal_recommendations.story_text);
    for (slot, meals) in response.meal_recommendations.slots.iter() {
        if meals.is_empty() {
            continue;
        }
        println!("{}:", slot);
        for meal in meals {
            match meal.diet_preference() {
                Some(diet) => println!("  - {} ({})", meal.title(), diet),
                None => println!("  - {}", meal.title()),
            }
        }
    }
}
