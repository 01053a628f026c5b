use std::sync::Arc;

use models::{ModelClass, Object};
use service::{persistence, Storage};

use crate::command::{self, Command};
use crate::errors::ConsoleError;

const HELP: &str = "\
Documented commands:
  create <Class>                       create and save a new object, print its id
  show <Class> <id>                    print an object
  destroy <Class> <id>                 delete an object
  all [<Class>]                        print all objects, optionally of one class
  count <Class>                        number of objects of a class
  update <Class> <id> <attr> \"<value>\" set one attribute and save
  <Class>.all() | .count() | .show(\"<id>\") | .destroy(\"<id>\") | .update(\"<id>\", \"<attr>\", \"<value>\")
  quit | EOF                           exit";

/// Output of one command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self { lines: vec![text.into()], quit: false }
    }

    fn quit() -> Self {
        Self { lines: Vec::new(), quit: true }
    }
}

/// Executes commands against a storage engine owned by the caller.
pub struct Console {
    storage: Arc<dyn Storage>,
}

impl Console {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub async fn execute(&self, line: &str) -> Result<Reply, ConsoleError> {
        match command::parse(line) {
            Command::Empty => Ok(Reply::default()),
            Command::Quit => Ok(Reply::quit()),
            Command::Help => Ok(Reply::line(HELP)),
            Command::Create(args) => {
                let class = class_arg(&args)?;
                let object = persistence::create_object(&*self.storage, class).await?;
                self.storage.save().await?;
                Ok(Reply::line(object.id()))
            }
            Command::Show(args) => {
                let object = self.lookup(&args).await?;
                Ok(Reply::line(object.to_string()))
            }
            Command::Destroy(args) => {
                let object = self.lookup(&args).await?;
                persistence::delete_object(&*self.storage, &object).await?;
                Ok(Reply::default())
            }
            Command::All(args) => {
                let filter = args.first().map(|name| parse_class(name)).transpose()?;
                let objects = self.storage.all(filter.map(ModelClass::as_str)).await?;
                let shown: Vec<String> = objects.values().map(Object::to_string).collect();
                Ok(Reply::line(format!("[{}]", shown.join(", "))))
            }
            Command::Count(args) => {
                let class = class_arg(&args)?;
                let n = self.storage.count(Some(class.as_str())).await?;
                Ok(Reply::line(n.to_string()))
            }
            Command::Update(args) => {
                let mut object = self.lookup(&args).await?;
                let attr = args.get(2).ok_or(ConsoleError::AttributeMissing)?;
                let value = args.get(3).ok_or(ConsoleError::ValueMissing)?;
                persistence::set_attribute(&mut object, attr, value)?;
                persistence::save_object(&*self.storage, &mut object).await?;
                Ok(Reply::default())
            }
            Command::Unknown(line) => Err(ConsoleError::UnknownSyntax(line)),
        }
    }

    async fn lookup(&self, args: &[String]) -> Result<Object, ConsoleError> {
        let class = class_arg(args)?;
        let id = args.get(1).ok_or(ConsoleError::IdMissing)?;
        self.storage.get(class.as_str(), id).await?.ok_or(ConsoleError::NoInstance)
    }
}

fn class_arg(args: &[String]) -> Result<ModelClass, ConsoleError> {
    let name = args.first().ok_or(ConsoleError::ClassNameMissing)?;
    parse_class(name)
}

fn parse_class(name: &str) -> Result<ModelClass, ConsoleError> {
    name.parse().map_err(|_| ConsoleError::ClassUnknown)
}
