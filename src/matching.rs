use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::Error;
use crate::library::{AlbumIndex, LocalFile};
use crate::spotify::custom_types::RemoteTrack;

/// Candidate local files found for one remote track.
#[derive(Debug, PartialEq)]
pub struct TrackCandidates<'a> {
    pub track: &'a RemoteTrack,
    pub files: Vec<&'a LocalFile>,
}

/// The outcome of disambiguation, both halves in playlist position order.
#[derive(Debug, PartialEq)]
pub struct Resolution<'a> {
    /// The chosen local file per matched track.
    pub resolved: Vec<&'a LocalFile>,
    /// Remote tracks with no local candidates.
    pub unmatched: Vec<&'a RemoteTrack>,
}

/// Disambiguation policy: given two or more candidates for a track, returns
/// the index of the one to keep.
pub trait Chooser {
    fn choose(&mut self, candidates: &[&LocalFile], track_name: &str) -> usize;
}

/// Keeps the first candidate.
pub struct FirstMatch;

impl Chooser for FirstMatch {
    fn choose(&mut self, _candidates: &[&LocalFile], _track_name: &str) -> usize {
        0
    }
}

/// Keeps the candidate with the highest bitrate, first one winning a tie.
pub struct HighestBitrate;

impl Chooser for HighestBitrate {
    fn choose(&mut self, candidates: &[&LocalFile], _track_name: &str) -> usize {
        let mut best = 0;
        for (i, file) in candidates.iter().enumerate().skip(1) {
            if file.bitrate > candidates[best].bitrate {
                best = i;
            }
        }
        best
    }
}

/// Parses a 1-based candidate selection against a list of length `len`.
pub fn parse_choice(input: &str, len: usize) -> Result<usize, Error> {
    let trimmed = input.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| Error::InvalidChoice(trimmed.to_owned()))?;
    if choice == 0 || choice > len {
        return Err(Error::InvalidChoice(trimmed.to_owned()));
    }
    Ok(choice - 1)
}

/// Groups remote track IDs by `"artist - album"`. A track appears under one
/// key per artist, so any artist-album pairing can match the local grouping.
/// IDs under each key are in playlist position order.
pub fn remote_album_index(tracks: &HashMap<String, RemoteTrack>) -> BTreeMap<String, Vec<&str>> {
    let mut ordered: Vec<&RemoteTrack> = tracks.values().collect();
    ordered.sort_by_key(|track| track.position);

    let mut albums: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for track in ordered {
        for artist in &track.artists {
            albums
                .entry(format!("{artist} - {}", track.album))
                .or_default()
                .push(&track.id);
        }
    }
    albums
}

/// Annotates every remote track with the local files matching it.
///
/// Matching is strictly per album group: a remote album key absent from the
/// local index yields zero candidates for every track under it, and titles
/// compare by trimmed, lowercased equality only. A track matching under more
/// than one artist-album key accumulates candidates from each; nothing is
/// deduplicated here. Results are ordered by playlist position.
pub fn find_candidates<'a>(
    tracks: &'a HashMap<String, RemoteTrack>,
    index: &'a AlbumIndex,
) -> Vec<TrackCandidates<'a>> {
    let mut files_by_id: HashMap<&str, Vec<&'a LocalFile>> = HashMap::new();

    for (key, ids) in remote_album_index(tracks) {
        let Some(group) = index.get(&key) else {
            continue;
        };

        for id in ids {
            let wanted = tracks[id].name.trim().to_lowercase();
            let candidates = files_by_id.entry(id).or_default();
            for file in &group.tracks {
                if file.title.trim().to_lowercase() == wanted {
                    candidates.push(file);
                }
            }
        }
    }

    let mut results: Vec<TrackCandidates<'a>> = tracks
        .values()
        .map(|track| TrackCandidates {
            track,
            files: files_by_id.remove(track.id.as_str()).unwrap_or_default(),
        })
        .collect();
    results.sort_by_key(|entry| entry.track.position);
    results
}

/// Reduces each candidate list to at most one file.
///
/// Candidates are deduplicated by path first, so the chooser only ever sees
/// a real ambiguity. Tracks without candidates are recorded in `unmatched`
/// rather than silently dropped.
pub fn resolve<'a>(candidates: &[TrackCandidates<'a>], chooser: &mut dyn Chooser) -> Resolution<'a> {
    let mut resolved = Vec::new();
    let mut unmatched = Vec::new();

    for entry in candidates {
        let mut seen = HashSet::new();
        let files: Vec<&LocalFile> = entry
            .files
            .iter()
            .copied()
            .filter(|file| seen.insert(file.path.as_path()))
            .collect();

        match files.len() {
            0 => unmatched.push(entry.track),
            1 => resolved.push(files[0]),
            _ => resolved.push(files[chooser.choose(&files, &entry.track.name)]),
        }
    }

    Resolution { resolved, unmatched }
}
