use std::sync::Arc;

use console::{run, Console};
use models::User;
use service::{FileStorage, Storage};

fn temp_file(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("hbnb_console_{}_{}.json", tag, uuid::Uuid::new_v4()))
}

fn console_over(path: &std::path::Path) -> Console {
    Console::new(Arc::new(FileStorage::open(path)))
}

async fn exec(console: &Console, line: &str) -> String {
    match console.execute(line).await {
        Ok(reply) => reply.lines.join("\n"),
        Err(e) => e.to_string(),
    }
}

#[tokio::test]
async fn create_show_update_destroy() -> anyhow::Result<()> {
    let tmp = temp_file("crud");
    let console = console_over(&tmp);

    let id = exec(&console, "create User").await;
    assert_eq!(id.len(), 36);
    assert!(tmp.exists());

    let shown = exec(&console, &format!("show User {id}")).await;
    assert!(shown.starts_with(&format!("[User] ({id})")));

    assert_eq!(exec(&console, &format!(r#"update User {id} first_name "Betty Ann""#)).await, "");
    let object = console.storage().get("User", &id).await?.unwrap();
    assert_eq!(object.downcast_ref::<User>().unwrap().first_name, "Betty Ann");

    assert_eq!(exec(&console, &format!(r#"User.update("{id}", "last_name", "Holberton")"#)).await, "");
    assert_eq!(exec(&console, "User.count()").await, "1");
    assert_eq!(exec(&console, "count User").await, "1");

    // state survives a restart
    let restarted = console_over(&tmp);
    restarted.storage().reload().await?;
    let shown = exec(&restarted, &format!(r#"User.show("{id}")"#)).await;
    assert!(shown.contains("\"last_name\":\"Holberton\""));

    assert_eq!(exec(&restarted, &format!("destroy User {id}")).await, "");
    assert_eq!(exec(&restarted, &format!("show User {id}")).await, "** no instance found **");
    assert_eq!(exec(&restarted, "all").await, "[]");

    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn error_messages() {
    let console = console_over(&temp_file("errors"));
    assert_eq!(exec(&console, "create").await, "** class name missing **");
    assert_eq!(exec(&console, "create BaseModel").await, "** class doesn't exist **");
    assert_eq!(exec(&console, "show User").await, "** instance id missing **");
    assert_eq!(exec(&console, "show User 123").await, "** no instance found **");
    assert_eq!(exec(&console, "all Spaceship").await, "** class doesn't exist **");
    assert_eq!(exec(&console, "count").await, "** class name missing **");
    assert_eq!(exec(&console, "jump").await, "*** Unknown syntax: jump");

    let id = exec(&console, "create Place").await;
    assert_eq!(exec(&console, &format!("update Place {id}")).await, "** attribute name missing **");
    assert_eq!(exec(&console, &format!("update Place {id} name")).await, "** value missing **");
    assert!(exec(&console, &format!("update Place {id} id other")).await.starts_with("** validation error"));
}

#[tokio::test]
async fn all_filters_by_class() {
    let console = console_over(&temp_file("all"));
    exec(&console, "create User").await;
    exec(&console, "create State").await;
    exec(&console, "create State").await;
    let states = exec(&console, "State.all()").await;
    assert_eq!(states.matches("[State]").count(), 2);
    assert!(!states.contains("[User]"));
    assert_eq!(exec(&console, "all").await.matches("] (").count(), 3);
}

#[tokio::test]
async fn run_loop_reads_until_quit() -> anyhow::Result<()> {
    let console = console_over(&temp_file("loop"));
    let input: &[u8] = b"create Amenity\n\ncount Amenity\nbogus\nquit\ncount Amenity\n";
    let mut output = Vec::new();
    run(&console, tokio::io::BufReader::new(input), &mut output, false).await?;

    let text = String::from_utf8(output)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].len(), 36);
    assert_eq!(lines[1], "1");
    assert_eq!(lines[2], "*** Unknown syntax: bogus");
    Ok(())
}
