use crate::domain::model::{Candidate, CandidatePatch};
use clap::{Args, Subcommand};
use serde_json::Value;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print every candidate
    List,
    /// Case-insensitive substring search
    Search { term: String },
    /// Look up a single candidate by email
    Get { email: String },
    /// Register a new candidate
    Add(CandidateArgs),
    /// Change fields of an existing candidate
    Update {
        email: String,
        #[command(flatten)]
        patch: PatchArgs,
    },
    /// Remove a candidate by email
    Remove { email: String },
    /// Write the current collection to the candidates file
    Save,
}

#[derive(Debug, Clone, Args)]
pub struct CandidateArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub role: String,

    #[arg(long = "skill", value_delimiter = ',')]
    pub skills: Vec<String>,

    #[arg(long = "language", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Extra profile field as key=value; JSON values are parsed, anything else is a string
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

impl From<CandidateArgs> for Candidate {
    fn from(args: CandidateArgs) -> Self {
        Candidate {
            first_name: args.first_name,
            last_name: args.last_name,
            full_name: args.full_name,
            email: args.email,
            current_role: args.role,
            skills: args.skills,
            spoken_languages: args.languages,
            profile: args.fields.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PatchArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub full_name: Option<String>,

    /// New email address for the candidate
    #[arg(long = "new-email")]
    pub new_email: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    /// Replaces the whole skill list
    #[arg(long = "skills", value_delimiter = ',')]
    pub skills: Option<Vec<String>>,

    /// Replaces the whole spoken language list
    #[arg(long = "languages", value_delimiter = ',')]
    pub languages: Option<Vec<String>>,

    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,

    /// Remove an extra profile field
    #[arg(long = "unset")]
    pub unset: Vec<String>,
}

impl From<PatchArgs> for CandidatePatch {
    fn from(args: PatchArgs) -> Self {
        let mut profile: std::collections::BTreeMap<String, Value> =
            args.fields.into_iter().collect();
        for key in args.unset {
            profile.insert(key, Value::Null);
        }

        CandidatePatch {
            first_name: args.first_name,
            last_name: args.last_name,
            full_name: args.full_name,
            email: args.new_email,
            current_role: args.role,
            skills: args.skills,
            spoken_languages: args.languages,
            profile,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err("field name cannot be empty".to_string());
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
