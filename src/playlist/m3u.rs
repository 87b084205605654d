use super::PlaylistEntry;

pub const UNTITLED: &str = "Untitled";

/// Title carried by an `#EXTINF:` line, i.e. whatever follows the last comma
fn extinf_title(line: &str) -> &str {
    match line.rfind(',') {
        Some(comma) => match line[comma + 1..].trim() {
            "" => UNTITLED,
            title => title,
        },
        None => UNTITLED,
    }
}

/// Parses classic IPTV M3U text
///
/// URI lines that are not preceded by an `#EXTINF:` line are dropped.
pub fn parse(text: &str) -> Vec<PlaylistEntry> {
    let mut entries = Vec::new();
    let mut pending_title: Option<&str> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("#EXTINF:") {
            pending_title = Some(extinf_title(line));
        } else if line.starts_with('#') {
            continue;
        } else if let Some(title) = pending_title.take() {
            entries.push(PlaylistEntry::new(title, line));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_come_from_last_comma() {
        let text = "#EXTM3U\r\n\
            #EXTINF:-1 tvg-id=\"a.b\" tvg-name=\"A, B\" group-title=\"News\",A, B News HD\r\n\
            http://x/a.ts\r\n\
            \r\n\
            #EXTINF:-1,  Spaced  \r\n\
            #EXTVLCOPT:http-user-agent=VLC\r\n\
            http://x/b.ts\r\n";

        assert_eq!(
            parse(text),
            vec![
                PlaylistEntry::new("B News HD", "http://x/a.ts"),
                PlaylistEntry::new("Spaced", "http://x/b.ts"),
            ]
        );
    }

    #[test]
    fn missing_title_is_untitled() {
        let text = "#EXTM3U\n#EXTINF:-1,\nhttp://x/a.ts\n#EXTINF:-1\nhttp://x/b.ts\n";
        let titles = parse(text).into_iter().map(|e| e.title).collect::<Vec<_>>();
        assert_eq!(titles, [UNTITLED, UNTITLED]);
    }

    #[test]
    fn uri_without_extinf_is_dropped() {
        let text = "#EXTM3U\nhttp://x/a.ts\n#EXTINF:-1,Foo\nhttp://x/b.ts\n";
        assert_eq!(parse(text), vec![PlaylistEntry::new("Foo", "http://x/b.ts")]);
    }

    #[test]
    fn later_extinf_replaces_pending_title() {
        let text = "#EXTM3U\n#EXTINF:-1,Old\n#EXTINF:-1,New\nhttp://x/a.ts\nhttp://x/b.ts\n";
        assert_eq!(parse(text), vec![PlaylistEntry::new("New", "http://x/a.ts")]);
    }

    #[test]
    fn keeps_source_order() {
        let text = (0..200)
            .map(|i| format!("#EXTINF:-1,Channel {i}\nhttp://x/{i}.ts\n"))
            .collect::<String>();
        let entries = parse(&format!("#EXTM3U\n{text}"));

        assert_eq!(entries.len(), 200);
        assert!(
            entries
                .iter()
                .enumerate()
                .all(|(i, e)| e.title == format!("Channel {i}") && e.uri == format!("http://x/{i}.ts"))
        );
    }
}
