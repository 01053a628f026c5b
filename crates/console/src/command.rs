//! Command-line parsing.
//!
//! Accepts the plain form `verb Class id attr "value"` and the dot-call form
//! `Class.verb("id", "attr", "value")`; both yield the same [`Command`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Quit,
    Create(Vec<String>),
    Show(Vec<String>),
    Destroy(Vec<String>),
    All(Vec<String>),
    Count(Vec<String>),
    Update(Vec<String>),
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if let Some(cmd) = parse_dot_call(line) {
        return cmd;
    }
    let mut tokens = tokenize(line).into_iter();
    let Some(verb) = tokens.next() else {
        return Command::Unknown(line.to_string());
    };
    from_verb(&verb, tokens.collect()).unwrap_or_else(|| Command::Unknown(line.to_string()))
}

fn from_verb(verb: &str, args: Vec<String>) -> Option<Command> {
    let cmd = match verb {
        "create" => Command::Create(args),
        "show" => Command::Show(args),
        "destroy" => Command::Destroy(args),
        "all" => Command::All(args),
        "count" => Command::Count(args),
        "update" => Command::Update(args),
        "help" => Command::Help,
        "quit" | "EOF" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// `Class.verb(args)`; the class becomes the first argument.
fn parse_dot_call(line: &str) -> Option<Command> {
    let (class, rest) = line.split_once('.')?;
    if class.is_empty() || class.contains(char::is_whitespace) {
        return None;
    }
    let (verb, args) = rest.strip_suffix(')')?.split_once('(')?;
    if matches!(verb, "help" | "quit" | "EOF") {
        return None;
    }
    let mut all_args = vec![class.to_string()];
    all_args.extend(tokenize(args));
    from_verb(verb, all_args)
}

/// Split on whitespace and commas; double quotes group and are stripped.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if !in_quotes && (c.is_whitespace() || c == ',') => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                    quoted = false;
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_commands() {
        assert_eq!(parse(""), Command::Empty);
        assert_eq!(parse("   "), Command::Empty);
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("EOF"), Command::Quit);
        assert_eq!(parse("create User"), Command::Create(args(&["User"])));
        assert_eq!(parse("all"), Command::All(vec![]));
        assert_eq!(
            parse(r#"update Place 42 description "sunny, with a view""#),
            Command::Update(args(&["Place", "42", "description", "sunny, with a view"]))
        );
        assert_eq!(parse("fly away"), Command::Unknown("fly away".into()));
        // separators only: no verb
        assert_eq!(parse(","), Command::Unknown(",".into()));
        assert_eq!(parse(", ,"), Command::Unknown(", ,".into()));
    }

    #[test]
    fn dot_calls() {
        assert_eq!(parse("User.all()"), Command::All(args(&["User"])));
        assert_eq!(parse("State.count()"), Command::Count(args(&["State"])));
        assert_eq!(parse(r#"City.show("c-1")"#), Command::Show(args(&["City", "c-1"])));
        assert_eq!(parse(r#"City.destroy("c-1")"#), Command::Destroy(args(&["City", "c-1"])));
        assert_eq!(
            parse(r#"User.update("u-1", "first_name", "Betty Ann")"#),
            Command::Update(args(&["User", "u-1", "first_name", "Betty Ann"]))
        );
        assert_eq!(parse("User.fly()"), Command::Unknown("User.fly()".into()));
    }

    #[test]
    fn tokenize_keeps_empty_quoted_values() {
        assert_eq!(tokenize(r#"a "" b"#), args(&["a", "", "b"]));
        assert_eq!(tokenize("a,b ,  c"), args(&["a", "b", "c"]));
    }
}
