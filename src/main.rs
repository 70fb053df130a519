mod cover;
mod error;
mod library;
mod m3u;
mod matching;
mod spotify;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::error::Error;
use crate::library::LocalFile;
use crate::matching::{Chooser, parse_choice};

#[derive(Parser)]
#[command(version, author, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror a Spotify playlist to an m3u8 playlist file with local tracks
    Mirror {
        /// Spotify application client ID
        #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
        client_id: String,

        /// Spotify application client secret
        #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
        client_secret: String,

        /// Spotify playlist ID to mirror
        playlist_id: String,

        /// The source directory to search for tracks (including subdirectories)
        source_dir: PathBuf,

        /// The full output file path; defaults to `<playlist_id>.m3u8` in the
        /// current directory. A remote cover image is downloaded next to it.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The title of the playlist; defaults to the Spotify given name
        #[arg(short, long)]
        title: Option<String>,

        /// The cover image of the playlist; defaults to the Spotify cover
        #[arg(short, long)]
        cover: Option<String>,

        /// Write track paths relative to the output file's directory
        #[arg(long)]
        relative: bool,

        /// How to pick between multiple matching local files
        #[arg(long, value_enum, default_value = "prompt")]
        choice: ChoicePolicy,
    },

    /// Print your playlists
    Playlists {
        /// Spotify user OAuth token
        #[arg(short = 'U', long, env = "SPOTIFY_USER_TOKEN", hide_env_values = true)]
        user_token: String,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum ChoicePolicy {
    /// Ask on the terminal
    Prompt,
    /// Keep the first matching file
    First,
    /// Keep the file with the highest bitrate
    HighestBitrate,
}

/// Interactive disambiguation: lists the candidates and reads a 1-based
/// selection from stdin, re-prompting until the input is valid.
struct PromptChooser;

impl Chooser for PromptChooser {
    fn choose(&mut self, candidates: &[&LocalFile], track_name: &str) -> usize {
        println!("Track {track_name} has multiple local files, choose one\n");

        let mut prompt = String::new();
        for (i, file) in candidates.iter().enumerate() {
            prompt.push_str(&format!(
                "{} - {} {}kps | {}\n",
                i + 1,
                file.title,
                file.bitrate,
                file.path.display(),
            ));
        }

        loop {
            print!("{prompt}");
            io::stdout().flush().ok();

            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line).is_err() || line.is_empty() {
                // stdin closed, keep the first candidate
                return 0;
            }
            match parse_choice(&line, candidates.len()) {
                Ok(choice) => return choice,
                Err(_) => println!("Option given not valid. Choose from these\n"),
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mirror {
            client_id,
            client_secret,
            playlist_id,
            source_dir,
            output,
            title,
            cover,
            relative,
            choice,
        } => {
            ensure!(spotify::validate_playlist_id(&playlist_id), "invalid playlist ID");

            let client = spotify::Client::new(spotify::Config::new(client_id, client_secret)).await?;

            let playlist = client
                .get_playlist(&playlist_id)
                .await?
                .ok_or_else(|| Error::PlaylistNotFound(playlist_id.clone()))?;
            if playlist.total_tracks == 0 {
                return Err(Error::EmptyPlaylist.into());
            }

            let raw_tracks = client.get_all_playlist_tracks(&playlist_id).await?;
            let tracks = spotify::custom_types::normalize_tracks(raw_tracks)?;

            let index = library::scan(&source_dir, library::DEFAULT_EXTENSIONS);
            if index.is_empty() {
                warn!("no usable audio files found in {}", source_dir.display());
            }
            let candidates = matching::find_candidates(&tracks, &index);

            println!("Building playlist...");

            let mut chooser: Box<dyn Chooser> = match choice {
                ChoicePolicy::Prompt => Box::new(PromptChooser),
                ChoicePolicy::First => Box::new(matching::FirstMatch),
                ChoicePolicy::HighestBitrate => Box::new(matching::HighestBitrate),
            };
            let resolution = matching::resolve(&candidates, chooser.as_mut());
            for track in &resolution.unmatched {
                println!("No local files found for track: {}", track.name);
            }
            if resolution.resolved.is_empty() {
                return Err(Error::EmptyTracklist.into());
            }

            let paths: Vec<PathBuf> =
                resolution.resolved.iter().map(|file| file.path.clone()).collect();

            let title = title.unwrap_or_else(|| playlist.name.clone());
            let output = std::path::absolute(
                output.unwrap_or_else(|| PathBuf::from(format!("{playlist_id}.m3u8"))),
            )?;

            let mut cover = cover.or(playlist.cover_url).unwrap_or_default();
            if cover.starts_with("http") {
                let output_dir = output.parent().unwrap_or(Path::new("."));
                let http = reqwest::Client::builder()
                    .timeout(Duration::from_secs(5))
                    .build()?;
                match cover::download_image(&http, &cover, output_dir).await {
                    Ok(path) => cover = path.display().to_string(),
                    Err(err) => {
                        warn!("failed to download cover image: {err}");
                        cover.clear();
                    }
                }
            }
            let cover = (!cover.is_empty()).then_some(cover);

            m3u::save(&output, &paths, cover.as_deref(), Some(title.as_str()), relative)?;

            println!(
                "Playlist \"{title}\" saved to \"{}\" with {}/{} tracks",
                output.display(),
                paths.len(),
                tracks.len(),
            );
        }
        Commands::Playlists { user_token } => {
            let client = spotify::Client::with_bearer(&user_token, Duration::from_secs(5))?;
            for playlist in client.my_playlists(50, 0).await? {
                println!("{}  {} ({} tracks)", playlist.id, playlist.name, playlist.total_tracks);
            }
        }
        Commands::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }
    Ok(())
}
