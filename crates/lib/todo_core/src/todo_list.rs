//! Single-user, in-memory todo list for the console tool.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Longest accepted title.
pub const MAX_TITLE_CHARS: usize = 100;

/// Longest accepted description.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Todo list errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoListError {
    #[error("Title cannot be empty or whitespace-only")]
    EmptyTitle,

    #[error("Title must be between 1 and 100 characters, got {0}")]
    TitleLength(usize),

    #[error("Description must be 500 characters or less, got {0}")]
    DescriptionLength(usize),

    #[error("Task with ID {0} does not exist")]
    NotFound(u64),
}

/// One console todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed { "[x]" } else { "[ ]" };
        write!(f, "{status} {}. {}", self.id, self.title)
    }
}

fn check_title(title: &str) -> Result<(), TodoListError> {
    if title.trim().is_empty() {
        return Err(TodoListError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(TodoListError::TitleLength(len));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), TodoListError> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_CHARS {
        return Err(TodoListError::DescriptionLength(len));
    }
    Ok(())
}

/// Ordered by id; ids are never reused within a list.
#[derive(Debug, Clone)]
pub struct TodoList {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoList {
    pub fn new() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn add(&mut self, title: &str, description: &str) -> Result<&Todo, TodoListError> {
        check_title(title)?;
        check_description(description)?;

        let id = self.next_id;
        self.next_id += 1;
        let todo = Todo {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
        };
        Ok(self.todos.entry(id).or_insert(todo))
    }

    pub fn get(&self, id: u64) -> Result<&Todo, TodoListError> {
        self.todos.get(&id).ok_or(TodoListError::NotFound(id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Todo> {
        self.todos.values()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Replace title and/or description; `None` keeps the current value.
    pub fn update(
        &mut self,
        id: u64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<&Todo, TodoListError> {
        if !self.todos.contains_key(&id) {
            return Err(TodoListError::NotFound(id));
        }
        if let Some(title) = title {
            check_title(title)?;
        }
        if let Some(description) = description {
            check_description(description)?;
        }
        let todo = self.todos.get_mut(&id).ok_or(TodoListError::NotFound(id))?;
        if let Some(title) = title {
            todo.title = title.to_string();
        }
        if let Some(description) = description {
            todo.description = description.to_string();
        }
        Ok(todo)
    }

    pub fn delete(&mut self, id: u64) -> Result<Todo, TodoListError> {
        self.todos.remove(&id).ok_or(TodoListError::NotFound(id))
    }

    pub fn mark_complete(&mut self, id: u64) -> Result<&Todo, TodoListError> {
        self.set_completed(id, true)
    }

    pub fn mark_incomplete(&mut self, id: u64) -> Result<&Todo, TodoListError> {
        self.set_completed(id, false)
    }

    fn set_completed(&mut self, id: u64, completed: bool) -> Result<&Todo, TodoListError> {
        let todo = self.todos.get_mut(&id).ok_or(TodoListError::NotFound(id))?;
        todo.completed = completed;
        Ok(todo)
    }
}
