//! Crossfade Demo: Two pages composited from layers, faded into each other.
//!
//! Draws a title page, captures it, draws a second page, then cross-fades
//! back and forth. Terminal resizes arrive as `SurfaceEvent`s from an input
//! thread over a crossbeam channel.
//!
//! Press 'q' or Escape to quit.

use crossbeam_channel::{tick, unbounded, Sender};
use crossterm::event::{self, Event, KeyCode};
use lattice::{
    BufferSnapshot, Crossfade, LayerStack, Presenter, RenderConfig, Rgb, Style, SurfaceEvent,
    TerminalSession,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const FADE: Duration = Duration::from_millis(800);
const HOLD: Duration = Duration::from_millis(1200);

fn draw_page(stack: &mut LayerStack, title: &str, accent: Rgb) {
    let (width, height) = stack.size();
    if stack.layer("backdrop").is_none() {
        stack.add_layer("backdrop", 0);
        stack.add_layer("text", 10);
    }

    if let Some(layer) = stack.layer_mut("backdrop") {
        let buffer = layer.buffer_mut();
        buffer.clear_transparent();
        for y in 0..height {
            let shade = (u32::from(y) * 60 / u32::from(height.max(1))) as u8;
            let bg = Rgb::new(accent.r / 4 + shade, accent.g / 4, accent.b / 4 + shade);
            buffer.fill_rect(0, i32::from(y), width, 1, " ", Style::DEFAULT.with_bg(bg));
        }
    }

    if let Some(layer) = stack.layer_mut("text") {
        let buffer = layer.buffer_mut();
        buffer.clear_transparent();
        let x = i32::from(width / 2) - (title.chars().count() as i32) / 2;
        let y = i32::from(height / 2);
        buffer.write_text(x, y, title, Style::new(accent, Rgb::BLACK).bold());
        buffer.write_text(2, i32::from(height) - 2, "q: quit", Style::DEFAULT.dim());
    }
}

/// Forward resizes and quit keys from crossterm to the render loop.
fn spawn_input(events: Sender<SurfaceEvent>, quit: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !quit.load(Ordering::Relaxed) {
            if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
                continue;
            }
            match event::read() {
                Ok(Event::Resize(width, height)) => {
                    let _ = events.send(SurfaceEvent::Resize { width, height });
                }
                Ok(Event::Key(key)) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => {
                    quit.store(true, Ordering::Relaxed);
                }
                Ok(_) => {}
                Err(_) => quit.store(true, Ordering::Relaxed),
            }
        }
    })
}

fn capture_page(presenter: &mut Presenter<TerminalSession>, title: &str, accent: Rgb) -> BufferSnapshot {
    draw_page(presenter.stack_mut(), title, accent);
    let mut frame = lattice::GridBuffer::new(presenter.stack().width(), presenter.stack().height());
    presenter.stack().composite(&mut frame);
    BufferSnapshot::capture(&frame)
}

fn main() -> std::io::Result<()> {
    let (width, height) = TerminalSession::size()?;
    let session = TerminalSession::enter()?;
    let config = RenderConfig::default().with_theme_background(Rgb::new(12, 12, 20));
    let mut presenter = Presenter::new(width, height, &config, session);

    let quit = Arc::new(AtomicBool::new(false));
    let (event_tx, event_rx) = unbounded();
    let input = spawn_input(event_tx, Arc::clone(&quit));
    let ticker = tick(Duration::from_millis(16));

    let pages = [("lattice", Rgb::new(120, 200, 255)), ("compositor", Rgb::new(255, 170, 90))];
    let mut current = 0;
    let mut fade: Option<(Crossfade, Instant)> = None;
    let mut held_since = Instant::now();

    draw_page(presenter.stack_mut(), pages[0].0, pages[0].1);
    presenter.present()?;

    while !quit.load(Ordering::Relaxed) {
        let _ = ticker.recv();

        if presenter.drain_events(&event_rx) > 0 {
            fade = None;
            draw_page(presenter.stack_mut(), pages[current].0, pages[current].1);
            presenter.present()?;
            held_since = Instant::now();
            continue;
        }

        if let Some((transition, started)) = &fade {
            let elapsed = started.elapsed();
            presenter.show_snapshot(&transition.frame_at(elapsed))?;
            if transition.is_finished(elapsed) {
                fade = None;
                presenter.present()?;
                held_since = Instant::now();
            }
        } else if held_since.elapsed() >= HOLD {
            let from = capture_page(&mut presenter, pages[current].0, pages[current].1);
            current = (current + 1) % pages.len();
            let to = capture_page(&mut presenter, pages[current].0, pages[current].1);
            fade = Some((Crossfade::new(from, to, FADE), Instant::now()));
        }
    }

    let _ = input.join();
    let frames = presenter.frame_count();
    drop(presenter);
    println!("{frames} frames presented");
    Ok(())
}
