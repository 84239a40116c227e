#![forbid(unsafe_code)]

//! Marker-follow demo: an `@` chases the model position every frame while
//! the status line rewrites only when the position actually changes.
//!
//! Keys: arrows move the marker, `u` unbinds everything (the registry
//! pauses and the screen freezes), `q` or Esc quits.
//!
//! Line 0 is driven by a change-detecting binding and counts its own
//! writes; line 1 is driven by an every-frame binding and counts frames.
//! Watching the two counters diverge is the whole point of the demo.

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use framelink::{BindingHandle, FrameClock, TickSource};
use framelink::{bind, bind_every_frame, unbind, with_shared_registry};

/// Raw-mode and alternate-screen lifecycle guard.
struct TerminalSession;

impl TerminalSession {
    fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn nudge(marker: &Cell<(u16, u16)>, dx: i32, dy: i32, cols: u16, rows: u16) {
    let (x, y) = marker.get();
    let x = (i32::from(x) + dx).clamp(0, i32::from(cols.saturating_sub(1))) as u16;
    // Keep the marker below the two status lines.
    let y = (i32::from(y) + dy).clamp(2, i32::from(rows.saturating_sub(1))) as u16;
    marker.set((x, y));
}

fn main() -> io::Result<()> {
    let _session = TerminalSession::new()?;
    let (cols, rows) = terminal::size()?;

    let marker = Rc::new(Cell::new((cols / 2, rows / 2)));
    let frames = Rc::new(Cell::new(0u64));

    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut handles: Vec<BindingHandle> = Vec::new();

    // The marker chases the model position every frame.
    {
        let marker = Rc::clone(&marker);
        let mut out = io::stdout();
        let last_drawn = Cell::new(None::<(u16, u16)>);
        handles.push(bind_every_frame(
            move || marker.get(),
            move |(x, y)| {
                if let Some((px, py)) = last_drawn.get()
                    && (px, py) != (x, y)
                {
                    let _ = queue!(out, MoveTo(px, py), Print(' '));
                }
                let _ = queue!(out, MoveTo(x, y), Print('@'));
                last_drawn.set(Some((x, y)));
            },
        ));
    }

    // Position label: rewritten only when the position changes.
    {
        let marker = Rc::clone(&marker);
        let mut out = io::stdout();
        let mut label_writes = 0u64;
        handles.push(bind(
            move || marker.get(),
            move |(x, y)| {
                label_writes += 1;
                let _ = queue!(
                    out,
                    MoveTo(0, 0),
                    Clear(ClearType::CurrentLine),
                    Print(format!("marker ({x:>3},{y:>3})  label writes {label_writes}")),
                );
            },
        ));
    }

    // Frame counter: rewritten every frame.
    {
        let frames = Rc::clone(&frames);
        let mut out = io::stdout();
        handles.push(bind_every_frame(
            move || frames.get(),
            move |n| {
                let _ = queue!(
                    out,
                    MoveTo(0, 1),
                    Clear(ClearType::CurrentLine),
                    Print(format!("frames ticked {n}  arrows move / u unbind / q quit")),
                );
            },
        ));
    }

    let mut clock = FrameClock::per_second(60);
    clock.start();

    loop {
        if event::poll(clock.timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('u') => {
                        for handle in &handles {
                            unbind(handle);
                        }
                    }
                    KeyCode::Left => nudge(&marker, -1, 0, cols, rows),
                    KeyCode::Right => nudge(&marker, 1, 0, cols, rows),
                    KeyCode::Up => nudge(&marker, 0, -1, cols, rows),
                    KeyCode::Down => nudge(&marker, 0, 1, cols, rows),
                    _ => {}
                },
                _ => {}
            }
        }

        if clock.poll() {
            frames.set(frames.get() + 1);
            with_shared_registry(|registry| {
                if registry.is_ticking() {
                    registry.handle_tick();
                }
            });
            io::stdout().flush()?;
        }
    }

    Ok(())
}
