use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::tempdir;

const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

fn tapescript(dir: &Path) -> Command {
    let mut command = Command::cargo_bin("tapescript").expect("binary built");
    command.current_dir(dir);
    command.env("HOME", dir);
    command.env("XDG_CONFIG_HOME", dir.join("config"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn runs_source_files_directly() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("hello.bf"), HELLO)?;

    tapescript(temp.path())
        .arg("hello.bf")
        .assert()
        .success()
        .stdout("Hello World!\n");

    assert!(!temp.path().join("out.cf").exists());
    Ok(())
}

#[test]
fn compiles_then_executes_bytecode() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("echo.bf"), ",[.,]")?;

    tapescript(temp.path())
        .args(["-c", "echo.bf"])
        .assert()
        .success()
        .stdout("");
    let bytecode = fs::read(temp.path().join("out.cf"))?;
    assert_eq!(bytecode.first(), Some(&b','));

    tapescript(temp.path())
        .arg("out.cf")
        .write_stdin("round trip")
        .assert()
        .success()
        .stdout("round trip");
    Ok(())
}

#[test]
fn combined_flags_write_explicit_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("prog.txt"), "+++++++++[>++++++++<-]>.")?;

    tapescript(temp.path())
        .args(["-ce", "-o", "prog.cf", "prog.txt"])
        .assert()
        .success()
        .stdout("H");
    assert!(temp.path().join("prog.cf").is_file());
    Ok(())
}

#[test]
fn unbalanced_source_exits_with_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("bad.bf"), "+[")?;

    tapescript(temp.path())
        .args(["-c", "bad.bf"])
        .assert()
        .code(2);
    assert!(!temp.path().join("out.cf").exists());
    Ok(())
}

#[test]
fn corrupt_bytecode_exits_with_three() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("bad.cf"), [b'+', 1, b'?', 0, 0, 0, 0])?;

    tapescript(temp.path()).arg("bad.cf").assert().code(3);
    Ok(())
}

#[test]
fn missing_input_exits_with_four() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    tapescript(temp.path()).arg("absent.bf").assert().code(4);
    Ok(())
}

#[test]
fn unknown_extension_exits_with_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("prog.md"), "+")?;
    tapescript(temp.path()).arg("prog.md").assert().code(1);
    Ok(())
}

#[test]
fn config_file_changes_default_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("prog.bf"), "+.")?;
    fs::write(
        temp.path().join("tool.toml"),
        "default_output = \"compiled.cf\"\n",
    )?;

    tapescript(temp.path())
        .args(["--config", "tool.toml", "-c", "prog.bf"])
        .assert()
        .success();
    assert_eq!(fs::read(temp.path().join("compiled.cf"))?, vec![b'+', 1, b'.']);
    Ok(())
}

#[test]
fn disassembler_lists_instructions() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let path = temp.path().join("loop.cf");
    fs::write(&path, [b'[', 0, 0, 0, 7, b'-', 1, b']', 0, 0, 0, 12])?;

    let output = Command::cargo_bin("tape_disasm")?
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output)?;
    assert!(text.contains("000000: loop 7 (-> 000012)"));
    assert!(text.contains("000005: dec 1"));
    assert!(text.contains("000007: end 12 (-> 000000)"));
    Ok(())
}
