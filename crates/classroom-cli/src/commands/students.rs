//! The `classroom students` commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};

use classroom_core::{Student, StudentId, StudentPatch, StudentRegistry};

use crate::config::load_config_from;

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Add a student
    Add {
        #[arg(long, allow_negative_numbers = true)]
        id: StudentId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        course: String,
        #[arg(long)]
        gpa: f64,
    },

    /// Display all students
    List,

    /// Show the first student with an ID
    Show {
        #[arg(long, allow_negative_numbers = true)]
        id: StudentId,
    },

    /// Update fields of the first student with an ID
    Update {
        #[arg(long, allow_negative_numbers = true)]
        id: StudentId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        gpa: Option<f64>,
    },

    /// Delete the first student with an ID
    Delete {
        #[arg(long, allow_negative_numbers = true)]
        id: StudentId,
    },

    /// Sort by GPA, highest first, and display
    Sort,

    /// Print the average GPA
    Average,
}

pub fn execute(command: StudentCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let mut registry =
        StudentRegistry::open(&config.students_path()).with_persist_sort(config.persist_sort);

    match command {
        StudentCommand::Add {
            id,
            name,
            age,
            course,
            gpa,
        } => {
            let student = Student::new(id, name, age, course, gpa)?;
            let outcome = registry.add(student);
            super::report_save(&outcome);
            println!("Student added successfully.");
        }
        StudentCommand::List => print_students(&registry),
        StudentCommand::Show { id } => {
            println!("{}", registry.find_by_id(id)?);
        }
        StudentCommand::Update {
            id,
            name,
            age,
            course,
            gpa,
        } => {
            let patch = StudentPatch {
                name,
                age,
                course,
                gpa,
            };
            anyhow::ensure!(
                !patch.is_empty(),
                "nothing to update: pass at least one of --name, --age, --course, --gpa"
            );
            let outcome = registry.update(id, patch)?;
            super::report_save(&outcome);
            println!("Student updated successfully.");
        }
        StudentCommand::Delete { id } => {
            let (removed, outcome) = registry.delete(id)?;
            super::report_save(&outcome);
            println!("Deleted: {removed}");
        }
        StudentCommand::Sort => {
            let outcome = registry.sort_by_gpa_descending();
            super::report_save(&outcome);
            println!("Students sorted by GPA (highest to lowest).");
            print_students(&registry);
        }
        StudentCommand::Average => {
            let average = registry.average_gpa()?;
            println!("Average GPA: {average:.2}");
        }
    }

    Ok(())
}

fn print_students(registry: &StudentRegistry) {
    if registry.is_empty() {
        println!("No students in the system.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Age", "Course", "GPA"]);
    for s in registry.students() {
        table.add_row(vec![
            Cell::new(s.id),
            Cell::new(&s.name),
            Cell::new(s.age),
            Cell::new(&s.course),
            Cell::new(format!("{:.2}", s.gpa)),
        ]);
    }
    println!("{table}");
}
