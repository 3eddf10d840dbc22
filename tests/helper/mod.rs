use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

/// Build an `APKINDEX.tar.gz` whose index member holds `packages`.
pub fn index_archive(packages: &[(&str, &str)]) -> Vec<u8> {
    let mut index = String::new();
    for (name, version) in packages {
        index.push_str(&format!(
            "C:Q1abcdefghijklmnopqrstuvwxyz=\nP:{name}\nV:{version}\nA:x86_64\nS:1024\nI:4096\n\
             T:{name} package\nU:https://example.org/\nL:MIT\no:{name}\nt:1565166385\n\n"
        ));
    }
    tar_gz(&[("DESCRIPTION", b"test"), ("APKINDEX", index.as_bytes())])
}

pub fn tar_gz(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}
