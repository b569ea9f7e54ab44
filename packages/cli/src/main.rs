use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::ExamVerdict;
use common::models::{CreateSubjectRequest, ExamRecord};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use exam_cli::api::{ApiClient, ApiError, DEFAULT_API_URL};
use exam_cli::form::{ExamForm, StudentDraft};

#[derive(Parser, Debug)]
#[command(name = "exam", version, about = "Exam records client")]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "EXAMS_API_URL",
        default_value = DEFAULT_API_URL,
        help = "Base URL of the exam server"
    )]
    api_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Students {
        #[command(subcommand)]
        command: StudentCommands,
    },
    Subjects {
        #[command(subcommand)]
        command: SubjectCommands,
    },
    Exams {
        #[command(subcommand)]
        command: ExamCommands,
    },
}

#[derive(Subcommand, Debug)]
enum StudentCommands {
    List,
    /// Register a student; prompts for anything not given.
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        mail: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SubjectCommands {
    List,
    Add { name: String },
}

#[derive(Subcommand, Debug)]
enum ExamCommands {
    List,
    Show { id: i32 },
    /// List only the subject marks of a record.
    Details { id: i32 },
    /// Enter a new exam record interactively.
    New,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", style("error:").red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let api = ApiClient::new(&cli.api_url).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Students { command } => match command {
            StudentCommands::List => list_students(&api),
            StudentCommands::Add { name, mail } => add_student(&api, name, mail),
        },
        Commands::Subjects { command } => match command {
            SubjectCommands::List => list_subjects(&api),
            SubjectCommands::Add { name } => {
                let subject = api.create_subject(&CreateSubjectRequest { subject_name: name })?;
                println!(
                    "{} subject #{} {}",
                    style("Created").green(),
                    subject.subject_id,
                    subject.subject_name
                );
                Ok(())
            }
        },
        Commands::Exams { command } => match command {
            ExamCommands::List => list_exams(&api),
            ExamCommands::Show { id } => show_exam(&api, id),
            ExamCommands::Details { id } => show_exam_details(&api, id),
            ExamCommands::New => new_exam(&api),
        },
    }
}

fn list_students(api: &ApiClient) -> Result<()> {
    let students = api.list_students()?;
    if students.is_empty() {
        println!("No students yet.");
        return Ok(());
    }
    println!("{:>5}  {:<30}  {}", "ID", "Name", "Mail");
    for s in students {
        println!("{:>5}  {:<30}  {}", s.student_id, s.student_name, s.mail);
    }
    Ok(())
}

fn list_subjects(api: &ApiClient) -> Result<()> {
    let subjects = api.list_subjects()?;
    if subjects.is_empty() {
        println!("No subjects yet.");
        return Ok(());
    }
    println!("{:>5}  {}", "ID", "Subject");
    for s in subjects {
        println!("{:>5}  {}", s.subject_id, s.subject_name);
    }
    Ok(())
}

fn add_student(api: &ApiClient, name: Option<String>, mail: Option<String>) -> Result<()> {
    let theme = ColorfulTheme::default();
    let name = match name {
        Some(name) => name,
        None => Input::with_theme(&theme)
            .with_prompt("Student name")
            .interact_text()?,
    };
    let mail = match mail {
        Some(mail) => mail,
        None => Input::with_theme(&theme)
            .with_prompt("Mail")
            .interact_text()?,
    };

    let request = match StudentDraft::new(name, mail).to_request() {
        Ok(request) => request,
        Err(issues) => {
            for issue in issues {
                eprintln!("  {} {issue}", style("✗").red());
            }
            anyhow::bail!("Student not created");
        }
    };

    let student = api.create_student(&request)?;
    println!(
        "{} student #{} {} <{}>",
        style("Created").green(),
        student.student_id,
        student.student_name,
        student.mail
    );
    Ok(())
}

fn verdict_label(verdict: ExamVerdict) -> String {
    match verdict {
        ExamVerdict::Pass => style(verdict).green().bold().to_string(),
        ExamVerdict::Fail => style(verdict).red().bold().to_string(),
    }
}

fn list_exams(api: &ApiClient) -> Result<()> {
    let records = api.list_exams()?;
    if records.is_empty() {
        println!("No exam records yet.");
        return Ok(());
    }
    println!(
        "{:>5}  {:<30}  {:>4}  {:>8}  {}",
        "ID", "Student", "Year", "Total", "Result"
    );
    for r in records {
        let name = r
            .student
            .as_ref()
            .map(|s| s.student_name.clone())
            .unwrap_or_else(|| format!("#{}", r.student_id));
        println!(
            "{:>5}  {:<30}  {:>4}  {:>8.2}  {}",
            r.master_id,
            name,
            r.exam_year,
            r.total_mark,
            verdict_label(r.pass_or_fail)
        );
    }
    Ok(())
}

fn print_record(record: &ExamRecord) {
    let student = record
        .student
        .as_ref()
        .map(|s| format!("{} <{}>", s.student_name, s.mail))
        .unwrap_or_else(|| format!("#{}", record.student_id));

    println!("{} #{}", style("Exam").bold(), record.master_id);
    println!("  Student: {student}");
    println!("  Year:    {}", record.exam_year);
    println!(
        "  Created: {}",
        record.create_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for d in &record.details {
        let subject = d
            .subject
            .as_ref()
            .map(|s| s.subject_name.clone())
            .unwrap_or_else(|| format!("#{}", d.subject_id));
        println!("    {:<24} {:>7.2}", subject, d.marks);
    }
    println!(
        "  Total:   {:.2}  {}",
        record.total_mark,
        verdict_label(record.pass_or_fail)
    );
}

fn show_exam(api: &ApiClient, id: i32) -> Result<()> {
    let record = api.get_exam(id)?;
    print_record(&record);
    Ok(())
}

fn show_exam_details(api: &ApiClient, id: i32) -> Result<()> {
    let details = api.get_exam_details(id)?;
    println!("{:>5}  {:<24}  {:>7}", "ID", "Subject", "Marks");
    for d in details {
        let subject = d
            .subject
            .map(|s| s.subject_name)
            .unwrap_or_else(|| format!("#{}", d.subject_id));
        println!("{:>5}  {:<24}  {:>7.2}", d.dtls_id, subject, d.marks);
    }
    Ok(())
}

fn new_exam(api: &ApiClient) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut form = ExamForm::new();
    form.load_lookups(api.list_students()?, api.list_subjects()?);

    if form.subjects().is_empty() {
        anyhow::bail!("No subjects exist yet; add one with `exam subjects add`");
    }

    choose_student(api, &theme, &mut form)?;

    let year: i32 = Input::with_theme(&theme)
        .with_prompt("Exam year")
        .default(form.exam_year())
        .interact_text()?;
    form.set_year(year);

    fill_row(&theme, &mut form, 0)?;

    loop {
        print_preview(&form);
        let actions = ["Add subject", "Remove subject", "Submit", "Cancel"];
        let action = Select::with_theme(&theme)
            .with_prompt("Next")
            .items(&actions)
            .default(0)
            .interact()?;

        match action {
            0 => {
                let row = form.add_row();
                fill_row(&theme, &mut form, row)?;
            }
            1 => {
                let labels = row_labels(&form);
                let row = Select::with_theme(&theme)
                    .with_prompt("Remove which row")
                    .items(&labels)
                    .interact()?;
                if !form.remove_row(row) {
                    println!("{}", style("At least one subject row is required.").yellow());
                }
            }
            2 => {
                let request = match form.to_request() {
                    Ok(request) => request,
                    Err(issues) => {
                        for issue in issues {
                            eprintln!("  {} {issue}", style("✗").red());
                        }
                        continue;
                    }
                };
                match api.create_exam(&request) {
                    Ok(record) => {
                        println!("{}", style("Exam saved.").green().bold());
                        print_record(&record);
                        form.reset();
                        return Ok(());
                    }
                    Err(err @ ApiError::Server { .. }) => {
                        eprintln!("  {} {err}", style("✗").red());
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            _ => {
                let discard = Confirm::with_theme(&theme)
                    .with_prompt("Discard this exam record?")
                    .default(false)
                    .interact()?;
                if discard {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    }
}

/// Search for a student until one is picked, registering a new one on `+`.
fn choose_student(api: &ApiClient, theme: &ColorfulTheme, form: &mut ExamForm) -> Result<()> {
    while form.student_id().is_none() {
        let query: String = Input::with_theme(theme)
            .with_prompt("Student (search by name or mail, blank for all, + to add)")
            .allow_empty(true)
            .interact_text()?;

        if query.trim() == "+" {
            register_student(api, theme, form)?;
            continue;
        }

        let matches: Vec<(i32, String)> = form
            .filter_students(&query)
            .into_iter()
            .map(|s| (s.student_id, format!("{} ({})", s.student_name, s.mail)))
            .collect();
        if matches.is_empty() {
            println!("{}", style("No students match.").yellow());
            continue;
        }

        let labels: Vec<&str> = matches.iter().map(|(_, label)| label.as_str()).collect();
        let picked = Select::with_theme(theme)
            .with_prompt("Select student")
            .items(&labels)
            .default(0)
            .interact()?;
        form.select_student(matches[picked].0);
    }
    println!("Student: {}", style(form.student_query()).cyan());
    Ok(())
}

fn register_student(api: &ApiClient, theme: &ColorfulTheme, form: &mut ExamForm) -> Result<()> {
    let name: String = Input::with_theme(theme)
        .with_prompt("New student name")
        .interact_text()?;
    let mail: String = Input::with_theme(theme)
        .with_prompt("Mail")
        .interact_text()?;

    let request = match StudentDraft::new(name, mail).to_request() {
        Ok(request) => request,
        Err(issues) => {
            for issue in issues {
                eprintln!("  {} {issue}", style("✗").red());
            }
            return Ok(());
        }
    };

    match api.create_student(&request) {
        Ok(student) => {
            println!("{}", style("Student added.").green());
            form.add_student(student);
            Ok(())
        }
        Err(err @ ApiError::Server { .. }) => {
            eprintln!("  {} {err}", style("✗").red());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn fill_row(theme: &ColorfulTheme, form: &mut ExamForm, row: usize) -> Result<()> {
    loop {
        let query: String = Input::with_theme(theme)
            .with_prompt(format!("Row {} subject (type 2+ letters to filter)", row + 1))
            .allow_empty(true)
            .interact_text()?;

        let matches: Vec<(i32, String)> = form
            .filter_subjects(&query)
            .into_iter()
            .map(|s| (s.subject_id, s.subject_name.clone()))
            .collect();
        if matches.is_empty() {
            println!("{}", style("No subjects match.").yellow());
            continue;
        }

        let labels: Vec<&str> = matches.iter().map(|(_, name)| name.as_str()).collect();
        let picked = Select::with_theme(theme)
            .with_prompt("Select subject")
            .items(&labels)
            .default(0)
            .interact()?;
        form.select_subject(row, matches[picked].0);
        break;
    }

    let marks: f64 = Input::with_theme(theme)
        .with_prompt("Marks (0-100)")
        .validate_with(|m: &f64| {
            common::validation::validate_marks(*m).map_err(|e| e.to_string())
        })
        .interact_text()?;
    form.set_marks(row, Some(marks));
    Ok(())
}

fn row_labels(form: &ExamForm) -> Vec<String> {
    form.rows()
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let subject = if r.subject_name.is_empty() {
                "(no subject)"
            } else {
                r.subject_name.as_str()
            };
            match r.marks {
                Some(m) => format!("{}. {subject} {m:.2}", i + 1),
                None => format!("{}. {subject} -", i + 1),
            }
        })
        .collect()
}

fn print_preview(form: &ExamForm) {
    println!();
    for label in row_labels(form) {
        println!("  {label}");
    }
    println!(
        "  Total: {:.2}  {}",
        form.total_mark(),
        verdict_label(form.pass_or_fail())
    );
}
