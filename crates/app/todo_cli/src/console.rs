//! Interactive menu over a [`TodoList`].

use std::io::{BufRead, Write};

use log::{debug, info};
use todo_core::todo_list::{TodoList, TodoListError};

use crate::Result;

const MENU: &str = "\
=== Todo Menu ===
a) Add task
v) View tasks
u) Update task
d) Delete task
c) Mark task complete
i) Mark task incomplete
q) Quit";

/// Menu loop reading commands from `input` and writing to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
    list: TodoList,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            list: TodoList::new(),
        }
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    /// Run until `q` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                debug!("input closed");
                break;
            };

            match choice.trim().to_lowercase().as_str() {
                "a" => self.add()?,
                "v" => self.view()?,
                "u" => self.update()?,
                "d" => self.delete()?,
                "c" => self.set_completed(true)?,
                "i" => self.set_completed(false)?,
                "q" => break,
                other => {
                    debug!("unknown menu choice {other:?}");
                    writeln!(self.output, "Invalid option. Please try again.")?;
                }
            }
        }
        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    /// Print `message` and read one line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompt for a task id. Prints the error and yields `None` on bad input.
    fn prompt_id(&mut self) -> Result<Option<u64>> {
        let Some(raw) = self.prompt("Task ID: ")? else {
            return Ok(None);
        };
        match raw.trim().parse() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Error: Task ID must be a number.")?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, err: TodoListError) -> Result<()> {
        writeln!(self.output, "Error: {err}")?;
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        let Some(title) = self.prompt("Title: ")? else {
            return Ok(());
        };
        let description = self
            .prompt("Description (optional): ")?
            .unwrap_or_default();

        match self.list.add(&title, &description) {
            Ok(todo) => {
                let id = todo.id;
                info!("added task {id}");
                writeln!(self.output, "Task added with ID {id}.")?;
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    fn view(&mut self) -> Result<()> {
        if self.list.is_empty() {
            writeln!(self.output, "No tasks yet.")?;
            return Ok(());
        }
        for todo in self.list.all() {
            writeln!(self.output, "{todo}")?;
            if !todo.description.is_empty() {
                writeln!(self.output, "    Description: {}", todo.description)?;
            }
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id()? else {
            return Ok(());
        };
        let current = match self.list.get(id) {
            Ok(todo) => todo.clone(),
            Err(e) => return self.report(e),
        };

        writeln!(self.output, "Current title: {}", current.title)?;
        let title = self.prompt("New title (leave empty to keep current): ")?;
        writeln!(self.output, "Current description: {}", current.description)?;
        let description = self.prompt("New description (leave empty to keep current): ")?;

        let title = title.filter(|t| !t.is_empty());
        let description = description.filter(|d| !d.is_empty());

        match self
            .list
            .update(id, title.as_deref(), description.as_deref())
        {
            Ok(_) => {
                info!("updated task {id}");
                writeln!(self.output, "Task {id} updated.")?;
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    fn delete(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id()? else {
            return Ok(());
        };
        match self.list.delete(id) {
            Ok(todo) => {
                info!("deleted task {id}");
                writeln!(self.output, "Task {id} ({}) deleted.", todo.title)?;
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    fn set_completed(&mut self, completed: bool) -> Result<()> {
        let Some(id) = self.prompt_id()? else {
            return Ok(());
        };
        let result = if completed {
            self.list.mark_complete(id)
        } else {
            self.list.mark_incomplete(id)
        };
        match result {
            Ok(_) => {
                let state = if completed { "complete" } else { "incomplete" };
                writeln!(self.output, "Task {id} marked {state}.")?;
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }
}
