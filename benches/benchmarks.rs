use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pepmap_rust::index::{bwt, corpus, fm, sa};
use pepmap_rust::io::fasta::FastaRecord;
use pepmap_rust::search::tag::Tag;
use pepmap_rust::search::{self, SearchParams};
use pepmap_rust::util::aa::{self, MatchingMode};

const RESIDUES: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

fn make_proteome(n_proteins: usize, protein_len: usize) -> Vec<FastaRecord> {
    let mut x: u32 = 42;
    (0..n_proteins)
        .map(|i| {
            let mut seq = Vec::with_capacity(protein_len);
            for _ in 0..protein_len {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                seq.push(RESIDUES[(x >> 16) as usize % RESIDUES.len()]);
            }
            FastaRecord {
                accession: format!("P{:05}", i),
                desc: None,
                seq,
            }
        })
        .collect()
}

fn build_fm_index(records: &[FastaRecord]) -> fm::FMIndex {
    let (text, spans) = corpus::build_corpus(records).unwrap();
    let sa_arr = sa::build_sa(&text);
    let bwt_arr = bwt::build_bwt(&text, &sa_arr);
    fm::FMIndex::build(
        text,
        bwt_arr,
        &sa_arr,
        spans,
        aa::SIGMA as u8,
        fm::DEFAULT_OCC_BLOCK,
        fm::DEFAULT_SA_SHIFT,
    )
    .unwrap()
}

fn bench_build_sa(c: &mut Criterion) {
    let records = make_proteome(20, 500);
    let (text, _) = corpus::build_corpus(&records).unwrap();

    c.bench_function("build_sa_10k", |b| {
        b.iter(|| {
            black_box(sa::build_sa(black_box(&text)));
        })
    });
}

fn bench_exact_peptide(c: &mut Criterion) {
    let records = make_proteome(20, 500);
    let peptide = String::from_utf8(records[7].seq[100..110].to_vec()).unwrap();
    let fm_idx = build_fm_index(&records);
    let params = SearchParams {
        matching: MatchingMode::String,
        ..SearchParams::default()
    };

    c.bench_function("exact_peptide_10aa", |b| {
        b.iter(|| {
            black_box(
                search::search_peptide(black_box(&fm_idx), black_box(&peptide), &params).unwrap(),
            );
        })
    });
}

fn bench_one_substitution(c: &mut Criterion) {
    let records = make_proteome(20, 500);
    let mut peptide = records[7].seq[100..110].to_vec();
    // 中间残基换掉，逼出错配边
    peptide[5] = if peptide[5] == b'W' { b'Y' } else { b'W' };
    let peptide = String::from_utf8(peptide).unwrap();
    let fm_idx = build_fm_index(&records);
    let params = SearchParams {
        max_substitutions: 1,
        matching: MatchingMode::String,
        ..SearchParams::default()
    };

    c.bench_function("approx_peptide_1sub", |b| {
        b.iter(|| {
            black_box(
                search::search_peptide(black_box(&fm_idx), black_box(&peptide), &params).unwrap(),
            );
        })
    });
}

fn bench_tag_search(c: &mut Criterion) {
    let records = make_proteome(20, 500);
    let seq = &records[3].seq;
    let anchor_a = String::from_utf8(seq[200..205].to_vec()).unwrap();
    let anchor_b = String::from_utf8(seq[207..212].to_vec()).unwrap();
    let gap_syms = aa::encode_seq(&seq[205..207]).unwrap();
    let gap = aa::mass_of(&gap_syms).unwrap();
    let tag = Tag::parse(&format!("{},{},{}", anchor_a, gap, anchor_b)).unwrap();
    let fm_idx = build_fm_index(&records);
    let params = SearchParams {
        matching: MatchingMode::String,
        ..SearchParams::default()
    };

    c.bench_function("tag_search_2aa_gap", |b| {
        b.iter(|| {
            black_box(search::search_tag(black_box(&fm_idx), black_box(&tag), &params).unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_build_sa,
    bench_exact_peptide,
    bench_one_substitution,
    bench_tag_search
);
criterion_main!(benches);
