use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use novella_script::{CompileOptions, Program};

fn make_script(lines: usize) -> String {
    let mut buf = String::with_capacity(lines * 40);

    for i in 0..lines {
        match i % 7 {
            0 => buf.push_str(&format!("@bg file=bg{i}.png duration=1.0 effect=fade\n")),
            1 => buf.push_str(&format!("*Alice*alice{i}.ogg*Hello world {i}\n")),
            2 => buf.push_str(&format!("Bob「Line number {i}」\n")),
            3 => buf.push_str(&format!(":label_{i}\n")),
            4 => buf.push_str(&format!("@chsx c=ch{i}.png t=0.5 bg=\"bg {i}.png\"\n")),
            5 => buf.push_str("# comment\n"),
            6 => {
                buf.push_str("<<<\n");
                buf.push_str(&format!("switch \"选项A{i}\" \"选项B{i}\" {{\n"));
                buf.push_str("case a\n  @set $1 = 1\nbreak\n");
                buf.push_str("case b\n  if $1 == 1 {\n    text\n  }\nbreak\n");
                buf.push_str("}\n>>>\n");
            }
            _ => unreachable!(),
        }
    }

    buf.push_str(":end\n@return\n");
    buf
}

fn bench_full(c: &mut Criterion) {
    let src = make_script(10_000);
    let options = CompileOptions::default();
    let mut group = c.benchmark_group("compile");
    group.sample_size(10);
    group.bench_function("compile 10k lines", |b| {
        b.iter(|| {
            let _program = Program::from_text("bench.txt", black_box(&src), &options);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_full);
criterion_main!(benches);
