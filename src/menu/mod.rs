//! Interactive console menu over the user directory

use crate::domain::NewUser;
use crate::error::AppError;
use crate::repository::UserRepository;
use crate::service::UserService;
use std::io::{self, BufRead, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    ListAll,
    FindById,
    Add,
    Modify,
    Delete,
    Quit,
}

impl MenuChoice {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "1" => Some(MenuChoice::ListAll),
            "2" => Some(MenuChoice::FindById),
            "3" => Some(MenuChoice::Add),
            "4" => Some(MenuChoice::Modify),
            "5" => Some(MenuChoice::Delete),
            "0" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Line-oriented menu loop reading from `input` and writing to `output`.
///
/// Database failures are reported on `output` and the loop goes on; only I/O
/// errors on the terminal itself end the session early.
pub struct ConsoleMenu<R: UserRepository, I: BufRead, O: Write> {
    service: UserService<R>,
    input: I,
    output: O,
}

impl<R: UserRepository, I: BufRead, O: Write> ConsoleMenu<R, I, O> {
    pub fn new(service: UserService<R>, input: I, output: O) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                writeln!(self.output, "Goodbye!")?;
                return Ok(());
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Quit) => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                Some(choice) => {
                    debug!(?choice, "Menu action");
                    self.dispatch(choice).await?;
                }
                None => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== USERS MENU ===")?;
        writeln!(self.output, "1. List all users")?;
        writeln!(self.output, "2. Find a user by id")?;
        writeln!(self.output, "3. Add a user")?;
        writeln!(self.output, "4. Modify a user")?;
        writeln!(self.output, "5. Delete a user")?;
        writeln!(self.output, "0. Quit")?;
        write!(self.output, "Choice: ")?;
        self.output.flush()
    }

    /// `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_id(&mut self, label: &str) -> io::Result<Option<i32>> {
        let Some(line) = self.prompt(label)? else {
            return Ok(None);
        };
        match line.trim().parse() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid id: '{}'.", line.trim())?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, err: &AppError) -> io::Result<()> {
        match err {
            AppError::NotFound(_) => writeln!(self.output, "No user found with this id."),
            other => writeln!(self.output, "Error: {}", other),
        }
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> io::Result<()> {
        match choice {
            MenuChoice::ListAll => match self.service.list().await {
                Ok(users) => {
                    if users.is_empty() {
                        writeln!(self.output, "No users.")?;
                    }
                    for user in users {
                        writeln!(self.output, "{}", user)?;
                    }
                    Ok(())
                }
                Err(e) => self.report(&e),
            },
            MenuChoice::FindById => {
                let Some(id) = self.prompt_id("Id to find: ")? else {
                    return Ok(());
                };
                match self.service.get(id).await {
                    Ok(user) => writeln!(self.output, "Found: {} - {}", user.name, user.email),
                    Err(e) => self.report(&e),
                }
            }
            MenuChoice::Add => {
                let Some(name) = self.prompt("Name: ")? else {
                    return Ok(());
                };
                let Some(email) = self.prompt("Email: ")? else {
                    return Ok(());
                };
                match self.service.create(NewUser { name, email }).await {
                    Ok(user) => writeln!(self.output, "User added with id {}.", user.id),
                    Err(e) => self.report(&e),
                }
            }
            MenuChoice::Modify => {
                let Some(id) = self.prompt_id("Id to modify: ")? else {
                    return Ok(());
                };
                // Check existence before asking for the new values
                match self.service.find(id).await {
                    Ok(Some(_)) => {}
                    Ok(None) => return writeln!(self.output, "No user found with this id."),
                    Err(e) => return self.report(&e),
                }
                let Some(name) = self.prompt("New name: ")? else {
                    return Ok(());
                };
                let Some(email) = self.prompt("New email: ")? else {
                    return Ok(());
                };
                match self.service.update(id, name, email).await {
                    Ok(_) => writeln!(self.output, "User updated."),
                    Err(e) => self.report(&e),
                }
            }
            MenuChoice::Delete => {
                let Some(id) = self.prompt_id("Id to delete: ")? else {
                    return Ok(());
                };
                match self.service.delete(id).await {
                    Ok(()) => writeln!(self.output, "User deleted."),
                    Err(e) => self.report(&e),
                }
            }
            MenuChoice::Quit => Ok(()),
        }
    }
}
