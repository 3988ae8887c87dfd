//! Interactive menu loop
//!
//! Reads choices line by line and drives the task store. Positions shown to
//! the user are 1-based and follow store order.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use taskmgr_core::task::{validate_priority, Task, TaskStore};

use crate::config::Config;

const MENU: &str = "\
1. Add a task
2. Delete a task
3. Show list of tasks
4. Update due date
5. Mark task as completed
6. Quit";

/// What the loop does after a menu action
enum Step {
    /// Print a separating blank line and show the menu again
    Next,
    /// Show the menu again right away
    Again,
    Quit,
}

/// Why a menu action stopped early
enum Interrupt {
    /// Bad number, date or priority; reported and the loop goes on
    Invalid,
    EndOfInput,
    Io(io::Error),
}

impl From<io::Error> for Interrupt {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<taskmgr_core::Error> for Interrupt {
    fn from(err: taskmgr_core::Error) -> Self {
        tracing::debug!(error = %err, "Rejected input");
        Self::Invalid
    }
}

type Action = std::result::Result<Step, Interrupt>;

pub struct Shell<R, W> {
    input: R,
    output: W,
    store: TaskStore,
    config: Config,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, store: TaskStore, config: Config) -> Self {
        Self {
            input,
            output,
            store,
            config,
        }
    }

    /// Run until the user saves and quits, or input ends
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;

            let step = match self.dispatch() {
                Ok(step) => step,
                Err(Interrupt::Invalid) => {
                    writeln!(self.output, "Invalid input. Please try again.")?;
                    Step::Next
                }
                Err(Interrupt::EndOfInput) => {
                    tracing::info!("End of input, exiting without saving");
                    return Ok(());
                }
                Err(Interrupt::Io(err)) => return Err(err),
            };

            match step {
                Step::Next => writeln!(self.output)?,
                Step::Again => {}
                Step::Quit => return Ok(()),
            }
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    fn dispatch(&mut self) -> Action {
        let choice = self.prompt("Enter your choice (1-6): ")?;
        match choice.trim() {
            "1" => self.add_task(),
            "2" => self.delete_task(),
            "3" => self.show_tasks(),
            "4" => self.update_due_date(),
            "5" => self.mark_completed(),
            "6" => self.save_and_quit(),
            _ => {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                Ok(Step::Next)
            }
        }
    }

    fn add_task(&mut self) -> Action {
        let title = self.prompt("Enter task title: ")?;
        let description = self.prompt("Enter task description: ")?;
        let due_date = self.prompt("Enter task due date (YYYY-MM-DD): ")?;
        let task_type = self.prompt("Enter task type (personal/work): ")?;

        let task = match task_type.trim().to_ascii_lowercase().as_str() {
            "personal" => {
                let category = self.prompt("Enter task category: ")?;
                Task::new(title, description, &due_date)?.personal(category)
            }
            "work" => {
                let mut priority = self.prompt_number("Enter task priority (1-5): ")?;
                if self.config.strict_priority {
                    priority = validate_priority(priority)?;
                }
                Task::new(title, description, &due_date)?.work(priority)
            }
            _ => Task::new(title, description, &due_date)?,
        };

        self.store.add(task);
        writeln!(self.output, "Task added successfully!")?;
        Ok(Step::Next)
    }

    fn delete_task(&mut self) -> Action {
        if self.store.is_empty() {
            writeln!(self.output, "No tasks to delete.")?;
            return Ok(Step::Again);
        }

        match self.select_task("Select a task to delete:")? {
            Some(task) => {
                self.store.remove(&task)?;
                writeln!(self.output, "Task deleted successfully!")?;
            }
            None => writeln!(self.output, "Invalid task number!")?,
        }
        Ok(Step::Next)
    }

    fn show_tasks(&mut self) -> Action {
        if self.store.is_empty() {
            writeln!(self.output, "No tasks available.")?;
        } else {
            for task in &self.store {
                writeln!(self.output, "{}\n", task)?;
            }
        }
        Ok(Step::Next)
    }

    fn update_due_date(&mut self) -> Action {
        if self.store.is_empty() {
            writeln!(self.output, "No tasks available.")?;
            return Ok(Step::Again);
        }

        match self.select_task("Select a task to update the due date:")? {
            Some(task) => {
                let new_due_date = self.prompt("Enter the new due date (YYYY-MM-DD): ")?;
                self.store.update_due_date(&task, &new_due_date)?;
                writeln!(self.output, "Due date updated successfully!")?;
            }
            None => writeln!(self.output, "Invalid task number!")?,
        }
        Ok(Step::Next)
    }

    fn mark_completed(&mut self) -> Action {
        if self.store.is_empty() {
            writeln!(self.output, "No tasks available.")?;
            return Ok(Step::Again);
        }

        match self.select_task("Select a task to mark as completed:")? {
            Some(task) => {
                self.store.mark_completed(&task)?;
                writeln!(self.output, "Task marked as completed!")?;
            }
            None => writeln!(self.output, "Invalid task number!")?,
        }
        Ok(Step::Next)
    }

    fn save_and_quit(&mut self) -> Action {
        let message = match &self.config.task_file {
            Some(path) => format!(
                "Enter the filename to save tasks (e.g., tasks.json) [{}]: ",
                path.display()
            ),
            None => "Enter the filename to save tasks (e.g., tasks.json): ".to_string(),
        };
        let answer = self.prompt(&message)?;

        let path = match (answer.trim(), &self.config.task_file) {
            ("", Some(default)) => default.clone(),
            ("", None) => return Err(Interrupt::Invalid),
            (name, _) => PathBuf::from(name),
        };

        match self.store.save_to_file(&path) {
            Ok(()) => {
                writeln!(self.output, "Tasks saved to file. Goodbye!")?;
                Ok(Step::Quit)
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "Save failed");
                writeln!(self.output, "Failed to save tasks: {}", err)?;
                Ok(Step::Next)
            }
        }
    }

    /// List titles with their positions and ask for one
    fn select_task(&mut self, heading: &str) -> std::result::Result<Option<Task>, Interrupt> {
        writeln!(self.output, "{}", heading)?;
        for (index, task) in self.store.iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, task.title)?;
        }

        let number = self.prompt_number("Enter the task number: ")?;
        Ok(usize::try_from(number)
            .ok()
            .and_then(|position| self.store.task_at(position))
            .cloned())
    }

    fn prompt(&mut self, message: &str) -> std::result::Result<String, Interrupt> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Interrupt::EndOfInput);
        }
        Ok(line.trim_end_matches(|c: char| c == '\n' || c == '\r').to_string())
    }

    fn prompt_number(&mut self, message: &str) -> std::result::Result<i64, Interrupt> {
        let answer = self.prompt(message)?;
        answer.trim().parse().map_err(|_| Interrupt::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use taskmgr_core::task::{TaskKind, TaskStatus};
    use tempfile::TempDir;

    fn run_with(input: &str, store: TaskStore, config: Config) -> (TaskStore, String) {
        let mut output: Vec<u8> = Vec::new();
        let mut shell = Shell::new(Cursor::new(input.to_string()), &mut output, store, config);
        shell.run().unwrap();
        let store = shell.store().clone();
        drop(shell);
        (store, String::from_utf8(output).unwrap())
    }

    fn run(input: &str) -> (TaskStore, String) {
        run_with(input, TaskStore::new(), Config::default())
    }

    fn two_tasks() -> TaskStore {
        let mut store = TaskStore::new();
        store.add(Task::new("Pay bills", "", "2024-03-15").unwrap());
        store.add(Task::new("Gym", "", "2024-03-16").unwrap());
        store
    }

    #[test]
    fn test_add_each_kind() {
        let input = "1\nGroceries\nMilk\n2024-03-15\npersonal\nhome\n\
                     1\nReport\nQ1\n2024-04-01\nwork\n3\n\
                     1\nMisc\n\n2024-05-01\nother\n";
        let (store, output) = run(input);

        assert_eq!(store.len(), 3);
        assert_eq!(store.task_at(1).unwrap().category(), Some("home"));
        assert_eq!(store.task_at(2).unwrap().priority(), Some(3));
        assert_eq!(store.task_at(3).unwrap().kind, TaskKind::Plain);
        assert_eq!(output.matches("Task added successfully!").count(), 3);
    }

    #[test]
    fn test_add_with_bad_date_or_priority() {
        let input = "1\nReport\nQ1\n2024-13-40\nwork\n3\n\
                     1\nReport\nQ1\n2024-04-01\nwork\nhigh\n";
        let (store, output) = run(input);

        assert!(store.is_empty());
        assert_eq!(output.matches("Invalid input. Please try again.").count(), 2);
    }

    #[test]
    fn test_strict_priority() {
        let input = "1\nReport\nQ1\n2024-04-01\nwork\n9\n";

        let (store, _) = run(input);
        assert_eq!(store.task_at(1).unwrap().priority(), Some(9));

        let config = Config {
            strict_priority: true,
            ..Config::default()
        };
        let (store, output) = run_with(input, TaskStore::new(), config);
        assert!(store.is_empty());
        assert!(output.contains("Invalid input. Please try again."));
    }

    #[test]
    fn test_delete_by_position() {
        let (store, output) = run_with("2\n1\n", two_tasks(), Config::default());

        assert!(output.contains("1. Pay bills\n2. Gym\n"));
        assert!(output.contains("Task deleted successfully!"));
        let titles: Vec<&str> = store.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Gym"]);
    }

    #[test]
    fn test_invalid_positions() {
        let (store, output) = run_with("2\n0\n2\n3\n5\n-1\n", two_tasks(), Config::default());

        assert_eq!(store, two_tasks());
        assert_eq!(output.matches("Invalid task number!").count(), 3);
    }

    #[test]
    fn test_non_numeric_position() {
        let (store, output) = run_with("5\nfirst\n", two_tasks(), Config::default());

        assert_eq!(store, two_tasks());
        assert!(output.contains("Invalid input. Please try again."));
    }

    #[test]
    fn test_empty_store_messages() {
        let (_, output) = run("2\n3\n4\n5\n");

        assert!(output.contains("No tasks to delete."));
        assert_eq!(output.matches("No tasks available.").count(), 3);
    }

    #[test]
    fn test_update_and_complete() {
        let (store, output) = run_with("4\n2\n2025-01-01\n5\n1\n5\n1\n", two_tasks(), Config::default());

        assert!(output.contains("Due date updated successfully!"));
        assert_eq!(output.matches("Task marked as completed!").count(), 2);
        assert_eq!(store.task_at(2).unwrap().due_date.to_string(), "2025-01-01");
        assert_eq!(store.task_at(1).unwrap().status, TaskStatus::Completed);
    }

    #[test]
    fn test_show_tasks() {
        let (_, output) = run_with("3\n", two_tasks(), Config::default());

        assert!(output.contains(
            "Title: Pay bills\nDescription: \nDue Date: 2024-03-15 00:00:00\nStatus: incomplete\n\n"
        ));
        assert!(output.contains("Title: Gym\n"));
    }

    #[test]
    fn test_invalid_choice() {
        let (_, output) = run("9\n");
        assert!(output.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn test_save_and_quit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let input = format!("6\n{}\n3\n", path.display());

        let (store, output) = run_with(&input, two_tasks(), Config::default());

        assert!(output.ends_with("Tasks saved to file. Goodbye!\n"));
        assert!(!output.contains("Title:"));

        let mut loaded = TaskStore::new();
        loaded.load_from_file(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_save_uses_configured_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let config = Config {
            task_file: Some(path.clone()),
            ..Config::default()
        };

        let (_, output) = run_with("6\n\n", two_tasks(), config);

        assert!(output.contains(&format!("[{}]", path.display())));
        assert!(path.exists());
    }

    #[test]
    fn test_failed_save_keeps_running() {
        let temp_dir = TempDir::new().unwrap();
        let bad = temp_dir.path().join("missing").join("tasks.json");
        let good = temp_dir.path().join("tasks.json");
        let input = format!("6\n{}\n6\n{}\n", bad.display(), good.display());

        let (_, output) = run_with(&input, two_tasks(), Config::default());

        assert!(output.contains("Failed to save tasks"));
        assert!(output.contains("Tasks saved to file. Goodbye!"));
        assert!(good.exists());
    }

    #[test]
    fn test_empty_filename_without_default() {
        let (_, output) = run("6\n\n");
        assert!(output.contains("Invalid input. Please try again."));
        assert!(!output.contains("Goodbye!"));
    }
}
