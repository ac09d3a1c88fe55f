//! In-memory pty used by tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use anyhow::{anyhow, Result};

use super::{PtySession, PtySpawner};

#[derive(Clone, Debug)]
pub enum Step {
    Output(Vec<u8>),
    Interrupted,
    Fail,
}

/// What the runner did to the fake child.
#[derive(Debug, Default)]
pub struct Observed {
    pub spawned: Vec<Vec<String>>,
    pub lines: Vec<String>,
    pub waited: bool,
}

/// Plays back a fixed output script and records every interaction.
#[derive(Clone, Default)]
pub struct ScriptedSpawner {
    pub steps: Vec<Step>,
    pub exit: Option<i32>,
    /// Lines typed into the child come back as output, like a terminal echo.
    pub echo_input: bool,
    pub refuse_spawn: bool,
    pub observed: Rc<RefCell<Observed>>,
}

impl ScriptedSpawner {
    pub fn new(exit: Option<i32>) -> Self {
        Self {
            exit,
            ..Self::default()
        }
    }

    pub fn output(mut self, bytes: &[u8]) -> Self {
        self.steps.push(Step::Output(bytes.to_vec()));
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

impl PtySpawner for ScriptedSpawner {
    fn spawn(&self, command: &[String]) -> Result<Box<dyn PtySession>> {
        if self.refuse_spawn {
            return Err(anyhow!("No such file or directory"));
        }
        self.observed.borrow_mut().spawned.push(command.to_vec());
        Ok(Box::new(ScriptedSession {
            steps: self.steps.iter().cloned().collect(),
            exit: self.exit,
            echo_input: self.echo_input,
            observed: Rc::clone(&self.observed),
        }))
    }
}

struct ScriptedSession {
    steps: VecDeque<Step>,
    exit: Option<i32>,
    echo_input: bool,
    observed: Rc<RefCell<Observed>>,
}

impl PtySession for ScriptedSession {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.steps.pop_front() {
            None => Ok(0),
            Some(Step::Output(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.steps.push_front(Step::Output(bytes[n..].to_vec()));
                }
                Ok(n)
            }
            Some(Step::Interrupted) => Err(io::Error::from(io::ErrorKind::Interrupted)),
            Some(Step::Fail) => Err(io::Error::other("pty read failed")),
        }
    }

    fn send_line(&mut self, line: &str) -> Result<()> {
        self.observed.borrow_mut().lines.push(format!("{}\n", line));
        if self.echo_input {
            self.steps.push_front(Step::Output(format!("{}\r\n", line).into_bytes()));
        }
        Ok(())
    }

    fn wait(&mut self) -> Result<Option<i32>> {
        self.observed.borrow_mut().waited = true;
        Ok(self.exit)
    }
}
