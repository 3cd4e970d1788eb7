//! ironlog - Personal workout tracker

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ironlog::db::Database;
use ironlog::progress::TrendRange;
use ironlog::sets::Reps;

const DEFAULT_DB_PATH: &str = "workoutTracker.db";

#[derive(Parser)]
#[command(name = "ironlog")]
#[command(author, version, about = "Personal workout tracker")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "IRONLOG_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List exercises in the catalog
    Exercises,

    /// List muscles
    Muscles,

    /// Add an exercise to the catalog
    AddExercise {
        name: String,

        /// Muscle ids the exercise works
        #[arg(short, long, value_delimiter = ',')]
        muscles: Vec<i64>,
    },

    /// List workout templates
    Templates,

    /// Show one template's exercises
    Template { id: i64 },

    /// List logged workouts, most recent first
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show a logged workout set by set
    Show {
        log_id: i64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a logged workout
    DeleteSession { log_id: i64 },

    /// Heaviest set per session for an exercise
    Progress {
        exercise_id: i64,

        /// week, month, year or all
        #[arg(short, long, default_value_t = TrendRange::All)]
        range: TrendRange,
    },
}

fn format_reps(reps: &Reps) -> String {
    match reps {
        Reps::Both(reps) => format!("{}", reps),
        Reps::Split { left, right } => format!("{}L/{}R", left, right),
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut db = Database::open(&cli.db)?;

    match cli.command {
        Commands::Exercises => {
            for exercise in db.list_exercises()? {
                println!("{:4} | {}", exercise.id, exercise.name);
            }
        }

        Commands::Muscles => {
            for muscle in db.list_muscles()? {
                println!("{:4} | {}", muscle.id, muscle.name);
            }
        }

        Commands::AddExercise { name, muscles } => {
            let id = db.add_exercise_with_muscles(&name, &muscles)?;
            println!("Added: {} (id: {})", name.trim(), id);
        }

        Commands::Templates => {
            for template in db.list_templates()? {
                let exercises = db.list_template_exercises(template.id)?;
                println!("{:4} | {:20} | {} exercises", template.id, template.name, exercises.len());
            }
        }

        Commands::Template { id } => {
            let template = db.get_template(id)?;
            println!("{}", template.name);
            println!("{:-<40}", "");
            for exercise in db.list_template_exercises(id)? {
                println!(
                    "{:24} | {} sets{}",
                    exercise.exercise_name,
                    exercise.sets_per_exercise,
                    if exercise.single_arm { " | single arm" } else { "" }
                );
            }
        }

        Commands::History { limit } => {
            println!("Recent workouts:");
            println!("{:-<60}", "");
            for session in db.list_sessions()?.iter().take(limit) {
                println!(
                    "{:4} | {} | {:20} | {} min",
                    session.log_id,
                    session.date.format("%Y-%m-%d %H:%M"),
                    session.workout_name,
                    session.duration().num_minutes()
                );
            }
        }

        Commands::Show { log_id, json } => {
            let detail = db.get_session_detail(log_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
                return Ok(());
            }
            println!(
                "{} - {}",
                detail.summary.workout_name,
                detail.summary.date.format("%Y-%m-%d %H:%M")
            );
            println!("{:-<40}", "");
            for exercise in &detail.exercises {
                println!("{}", exercise.exercise_name);
                for set in &exercise.sets {
                    println!("  {}. {} x {}", set.set_number, set.weight, format_reps(&set.reps));
                }
            }
        }

        Commands::DeleteSession { log_id } => {
            db.delete_session(log_id)?;
            println!("Deleted workout log {}", log_id);
        }

        Commands::Progress { exercise_id, range } => {
            for point in db.exercise_trend(exercise_id, range)? {
                println!("{} | {}", point.date.format("%Y-%m-%d"), point.max_weight);
            }
        }
    }

    Ok(())
}
