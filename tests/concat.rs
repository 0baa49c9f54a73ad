use catfishq::commands::concat::{self, ConcatOptions};
use catfishq::config::Config;
use catfishq::filter::{ChannelSet, CommentMode, Decision, StartTime, WindowSpec};
use catfishq::utils::file_discovery::InputSet;
use catfishq::CatError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const T0: &str = "2021-06-01T12:00:00Z";

fn fastq_entry(id: &str, comment: &str, seq: &str) -> String {
    let header = if comment.is_empty() {
        format!("@{}", id)
    } else {
        format!("@{} {}", id, comment)
    };
    format!("{}\n{}\n+\n{}\n", header, seq, "I".repeat(seq.len()))
}

fn write_fastq(dir: &Path, name: &str, entries: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let body: String = entries
        .iter()
        .map(|(id, comment, seq)| fastq_entry(id, comment, seq))
        .collect();
    fs::write(&path, body).expect("write fastq");
    path
}

fn options(dir: &TempDir, inputs: Vec<PathBuf>) -> ConcatOptions {
    let mut options = ConcatOptions::new(
        InputSet::new(inputs, false, Config::default().extensions),
        dir.path().join("out.fastq").to_string_lossy().into_owned(),
    );
    options.comments = CommentMode::Forward;
    options
}

fn output_ids(options: &ConcatOptions) -> Vec<String> {
    fs::read_to_string(&options.output)
        .expect("read output")
        .lines()
        .filter_map(|line| line.strip_prefix('@'))
        .map(|header| header.split(' ').next().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn dedup_keeps_first_occurrence_in_input_order() {
    let dir = TempDir::new().expect("tempdir");
    let first = write_fastq(dir.path(), "1.fastq", &[("A", "", "ACGT"), ("B", "", "ACGT")]);
    let second = write_fastq(dir.path(), "2.fastq", &[("B", "", "ACGT"), ("C", "", "ACGT")]);

    let mut opts = options(&dir, vec![first, second]);
    opts.dedup = true;
    let summary = concat::run(&opts, &Config::default(), false).expect("run");

    assert_eq!(output_ids(&opts), vec!["A", "B", "C"]);
    assert_eq!(summary.counters.reads, 3);
    assert_eq!(summary.counters.bases, 12);
    assert_eq!(summary.stats.files, 2);
}

#[test]
fn without_dedup_every_record_is_written() {
    let dir = TempDir::new().expect("tempdir");
    let first = write_fastq(dir.path(), "1.fastq", &[("A", "", "AC"), ("B", "", "AC")]);
    let second = write_fastq(dir.path(), "2.fastq", &[("B", "", "AC"), ("C", "", "AC")]);

    let opts = options(&dir, vec![first, second]);
    concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(output_ids(&opts), vec!["A", "B", "B", "C"]);
}

#[test]
fn read_cap_stops_the_whole_run() {
    let dir = TempDir::new().expect("tempdir");
    let first = write_fastq(dir.path(), "1.fastq", &[("r1", "", "ACGT")]);
    let second = write_fastq(
        dir.path(),
        "2.fastq",
        &[("r2", "", "ACGT"), ("r3", "", "ACGT"), ("r4", "", "ACGT"), ("r5", "", "ACGT")],
    );
    // never opened: reading it would fail the run
    let third = dir.path().join("3.fastq");
    fs::write(&third, "garbage that is not a sequence file\n").expect("write");

    let mut opts = options(&dir, vec![first, second, third]);
    opts.max_reads = Some(2);
    let summary = concat::run(&opts, &Config::default(), false).expect("run");

    assert_eq!(output_ids(&opts), vec!["r1", "r2"]);
    assert!(summary.stats.stopped);
    assert_eq!(summary.stats.files, 2);
    assert_eq!(summary.stats.processed, 2);
}

#[test]
fn base_cap_writes_the_crossing_record() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fastq(
        dir.path(),
        "1.fastq",
        &[("r1", "", "AAAAAA"), ("r2", "", "AAAAAA"), ("r3", "", "AAAAAA")],
    );
    let mut opts = options(&dir, vec![input]);
    opts.max_bases = Some(10);
    concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(output_ids(&opts), vec!["r1", "r2"]);
}

#[test]
fn directories_and_compressed_inputs_are_expanded() {
    let dir = TempDir::new().expect("tempdir");
    let run_dir = dir.path().join("run");
    fs::create_dir(&run_dir).expect("mkdir");
    write_fastq(&run_dir, "a.fastq", &[("plain", "", "ACGT")]);
    fs::write(run_dir.join("notes.txt"), "ignored").expect("write");

    let gz = fs::File::create(run_dir.join("b.fastq.gz")).expect("create gz");
    let mut writer = niffler::get_writer(
        Box::new(gz),
        niffler::compression::Format::Gzip,
        niffler::Level::One,
    )
    .expect("gz writer");
    writer
        .write_all(fastq_entry("zipped", "", "GGCC").as_bytes())
        .expect("write gz");
    drop(writer);

    let opts = options(&dir, vec![run_dir, dir.path().join("missing")]);
    let summary = concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(output_ids(&opts), vec!["plain", "zipped"]);
    assert_eq!(summary.stats.files, 2);
}

#[test]
fn wrap_mode_rewrites_comments_and_keeps_channel_selection() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fastq(
        dir.path(),
        "1.fastq",
        &[
            ("keep", "ch=3 start_time=2021-06-01T12:00:00Z", "ACGT"),
            ("drop", "ch=4 start_time=2021-06-01T12:00:00Z", "ACGT"),
            ("plain", "", "ACGT"),
        ],
    );
    let mut opts = options(&dir, vec![input]);
    opts.comments = CommentMode::Wrap;
    opts.channels = Some(ChannelSet::parse(&["1-3"]).expect("channels"));
    concat::run(&opts, &Config::default(), false).expect("run");

    let output = fs::read_to_string(&opts.output).expect("read output");
    assert_eq!(
        output,
        "@keep CO:Z:ch=3 start_time=2021-06-01T12:00:00Z\nACGT\n+\nIIII\n"
    );
}

#[test]
fn skip_mode_drops_comments() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fastq(dir.path(), "1.fastq", &[("r1", "ch=3", "AC")]);
    let mut opts = options(&dir, vec![input]);
    opts.comments = CommentMode::Skip;
    concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(fs::read_to_string(&opts.output).expect("read"), "@r1\nAC\n+\nII\n");
}

#[test]
fn auto_start_time_window() {
    let dir = TempDir::new().expect("tempdir");
    let first = write_fastq(
        dir.path(),
        "1.fastq",
        &[
            ("late", "ch=1 start_time=2021-06-01T12:20:00Z", "ACGT"),
            ("edge", "ch=1 start_time=2021-06-01T12:10:00Z", "ACGT"),
        ],
    );
    let second = write_fastq(
        dir.path(),
        "2.fastq",
        &[("early", &format!("ch=2 start_time={}", T0), "ACGT")],
    );

    let mut opts = options(&dir, vec![first, second]);
    opts.window = WindowSpec {
        start: Some(StartTime::Auto),
        max_offset_minutes: Some(10),
        min_offset_minutes: None,
    };
    concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(output_ids(&opts), vec!["edge", "early"]);
}

#[test]
fn missing_start_time_fails_the_run_when_a_window_is_active() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fastq(
        dir.path(),
        "1.fastq",
        &[
            ("ok", &format!("start_time={}", T0), "ACGT"),
            ("bad", "ch=1", "ACGT"),
        ],
    );
    let mut opts = options(&dir, vec![input]);
    opts.window = WindowSpec {
        start: Some(StartTime::parse(T0).expect("timestamp")),
        max_offset_minutes: Some(60),
        min_offset_minutes: Some(0),
    };

    let err = concat::run(&opts, &Config::default(), false).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<CatError>(),
        Some(CatError::MissingStartTime { read_id }) if read_id == "bad"
    ));
}

#[test]
fn read_id_and_decision_log_allow_lists() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fastq(
        dir.path(),
        "1.fastq",
        &[("r1", "", "AC"), ("r2", "", "AC"), ("r3", "", "AC")],
    );
    let ids = dir.path().join("ids.txt");
    fs::write(&ids, "r3\n\n").expect("write ids");
    let decisions = dir.path().join("as.csv");
    fs::write(
        &decisions,
        "batch_time,read_number,channel,num_samples,read_id,sequence_length,decision\n\
         1.0,1,1,100,r1,2,stop_receiving\n\
         1.0,2,1,100,r2,2,unblock\n",
    )
    .expect("write decisions");

    let mut opts = options(&dir, vec![input]);
    opts.allow_list.read_id_file = Some(ids);
    opts.allow_list.decision_log = Some(decisions);
    opts.allow_list.decisions = vec![Decision::StopReceiving];
    concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(output_ids(&opts), vec!["r1", "r3"]);
}

#[test]
fn configuration_errors_are_raised_before_output_is_created() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fastq(dir.path(), "1.fastq", &[("r1", "", "AC")]);
    let mut opts = options(&dir, vec![input]);
    opts.allow_list.decisions = vec![Decision::Unblock];

    let err = concat::run(&opts, &Config::default(), false).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<CatError>(),
        Some(CatError::InvalidParameter { .. })
    ));
    assert!(!Path::new(&opts.output).exists());
}

#[test]
fn length_and_quality_filters() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("1.fastq");
    fs::write(
        &path,
        "@short\nAC\n+\nII\n@lowq\nACGT\n+\n!!!!\n@good\nACGT\n+\nIIII\n",
    )
    .expect("write");

    let mut opts = options(&dir, vec![path]);
    opts.min_length = 3;
    opts.min_qscore = 20;
    concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(output_ids(&opts), vec!["good"]);
}

#[test]
fn fasta_inputs_pass_through() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("contigs.fa");
    fs::write(&path, ">c1 len=4\nACGT\n>c2\nGG\n").expect("write");

    let opts = options(&dir, vec![path]);
    concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(
        fs::read_to_string(&opts.output).expect("read"),
        ">c1 len=4\nACGT\n>c2\nGG\n"
    );
}

#[test]
fn tiny_inputs_do_not_abort_the_run() {
    let dir = TempDir::new().expect("tempdir");
    let tiny = dir.path().join("a.fa");
    fs::write(&tiny, ">a\nA").expect("write");
    let blank = dir.path().join("b.fa");
    fs::write(&blank, "\n").expect("write");

    let opts = options(&dir, vec![tiny, blank]);
    let summary = concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(fs::read_to_string(&opts.output).expect("read"), ">a\nA\n");
    assert_eq!(summary.stats.files, 2);
}

#[test]
fn tab_separated_fastq_headers_keep_their_channel() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("1.fastq");
    fs::write(&path, "@r1\tch=3\nA\n+\nI\n@r2\tch=4\nA\n+\nI\n").expect("write");

    let mut opts = options(&dir, vec![path]);
    opts.channels = Some(ChannelSet::parse(&["3"]).expect("channels"));
    let summary = concat::run(&opts, &Config::default(), false).expect("run");
    assert_eq!(summary.counters.reads, 1);
    assert_eq!(fs::read_to_string(&opts.output).expect("read"), "@r1 ch=3\nA\n+\nI\n");
}
