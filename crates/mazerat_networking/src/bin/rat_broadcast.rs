//! # Rat Broadcast Demo
//!
//! Drives a single rat around a small walled maze, broadcasting its state
//! to a multicast group and decoding whatever arrives on the same socket -
//! its own frames loop back, and any other demo on the LAN shows up too.
//!
//! ```bash
//! rat_broadcast --group 239.255.42.99 --port 7878 --rate 60 --duration 10
//! ```

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use mazerat_core::{Canvas, Direction, Maze, WALL};
use mazerat_networking::protocol::{decode, Packet};
use mazerat_networking::{McastLink, Rat};

/// Canvas that narrates wipes and draws instead of rendering them.
struct LogCanvas;

impl Canvas for LogCanvas {
    fn wipe(&mut self, x: u16, y: u16) {
        tracing::trace!("wipe ({x}, {y})");
    }

    fn draw(&mut self, x: u16, y: u16, dir: Direction) {
        tracing::trace!("draw ({x}, {y}) facing {dir:?}");
    }
}

fn turn_right(dir: Direction) -> Direction {
    match dir {
        Direction::North => Direction::East,
        Direction::East => Direction::South,
        Direction::South => Direction::West,
        Direction::West => Direction::North,
    }
}

/// A 12x12 box: walls around the rim, open floor inside.
fn demo_grid() -> Vec<Vec<u8>> {
    let size = 12;
    let mut cells = vec![vec![0u8; size]; size];
    for i in 0..size {
        cells[i][0] = WALL;
        cells[i][size - 1] = WALL;
        cells[0][i] = WALL;
        cells[size - 1][i] = WALL;
    }
    cells
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Simple flag parsing, no external deps.
    let args: Vec<String> = std::env::args().collect();
    let mut group: Ipv4Addr = "239.255.42.99".parse()?;
    let mut port = 7878_u16;
    let mut rate = 60_u32;
    let mut duration_secs = 10_u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--group" | "-g" => {
                if i + 1 < args.len() {
                    group = args[i + 1].parse().unwrap_or(group);
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(port);
                    i += 1;
                }
            }
            "--rate" | "-r" => {
                if i + 1 < args.len() {
                    rate = args[i + 1].parse().unwrap_or(rate);
                    i += 1;
                }
            }
            "--duration" | "-d" => {
                if i + 1 < args.len() {
                    duration_secs = args[i + 1].parse().unwrap_or(duration_secs);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: rat_broadcast [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -g, --group <ADDR>      Multicast group (default: 239.255.42.99)");
                println!("  -p, --port <PORT>       UDP port (default: 7878)");
                println!("  -r, --rate <HZ>         Tick rate (default: 60)");
                println!("  -d, --duration <SECS>   Run time (default: 10)");
                println!("  -h, --help              Show this help");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let cells = demo_grid();
    let maze = Maze::new(&cells);
    let mut canvas = LogCanvas;

    let mut rat = Rat::new(1, 1, Direction::North, "demo-rat", &mut rand::thread_rng())?;
    rat.attach_link(McastLink::open(group, port)?);
    tracing::info!("rat {} broadcasting to {group}:{port}", rat.id());

    let tick = Duration::from_micros(1_000_000 / u64::from(rate.max(1)));
    let deadline = Instant::now() + Duration::from_secs(duration_secs);
    let mut frame = 0_u64;
    let mut buf = [0_u8; 64];

    while Instant::now() < deadline {
        let start = Instant::now();

        // Walk forward, turn right at walls, fire every couple of seconds.
        let ahead = (rat.dir().step_x(rat.x()), rat.dir().step_y(rat.y()));
        if maze.is_wall(ahead.0, ahead.1) {
            rat.set_dir(turn_right(rat.dir()))?;
        } else if ahead.0 == rat.x() {
            rat.set_y(ahead.1)?;
        } else {
            rat.set_x(ahead.0)?;
        }
        if frame % (u64::from(rate.max(1)) * 2) == 0 {
            let outcome = rat.fire(&maze)?;
            tracing::debug!("fire -> {outcome:?}");
        }

        rat.update(&maze, &mut canvas)?;
        rat.render_wipe(&mut canvas);
        rat.render_draw(&mut canvas);

        // Drain the group.
        if let Some(link) = rat.link() {
            while let Some((len, from)) = link.recv(&mut buf)? {
                match decode(&buf[..len]) {
                    Ok(Packet::State(pkt)) => tracing::debug!(
                        "state from {from}: sender {} seqno {}",
                        pkt.header.sender,
                        pkt.header.seqno
                    ),
                    Ok(Packet::Name(pkt)) => {
                        tracing::debug!("nickname from {from}: {:?}", pkt.nickname_str());
                    }
                    Err(err) => tracing::warn!("undecodable frame from {from}: {err}"),
                }
            }
        }

        frame += 1;
        let spent = start.elapsed();
        if spent < tick {
            std::thread::sleep(tick - spent);
        }
    }

    if let Some(stats) = rat.link_stats() {
        tracing::info!(
            "done: {} frames, {} bytes, {} send errors",
            stats.frames_sent,
            stats.bytes_sent,
            stats.send_errors
        );
    }
    Ok(())
}
