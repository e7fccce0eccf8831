use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tinylang::interpreter::Interpreter;
use tinylang::{lexer, parser};

const FIB: &str = "\
ComeAndDo fib(n) {
    if (n < 2) { return n; }
    return fib(n - 1) + fib(n - 2);
}
print(fib(15));
";

const CLASSES: &str = "\
class Point {
    int x;
    int y;
    ComeAndDo init(int a, int b) { x = a; y = b; }
    ComeAndDo manhattan() { return x + y; }
}
int total = 0;
for (int i = 0; i < 100; i = i + 1) {
    Point p(3, 4);
    total = total + p.manhattan();
}
print(total);
";

fn bench_frontend(c: &mut Criterion) {
    for (label, source) in [("fib", FIB), ("classes", CLASSES)] {
        let tokens = lexer::tokenize(source).expect("tokenize");

        c.bench_function(&format!("frontend_tokenize_{label}"), |b| {
            b.iter(|| {
                let out = lexer::tokenize(black_box(source)).expect("tokenize");
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_parse_only_{label}"), |b| {
            b.iter(|| {
                let out = parser::parse_tokens(black_box(tokens.clone())).expect("parse");
                black_box(out);
            })
        });

        c.bench_function(&format!("interpret_{label}"), |b| {
            let program = parser::parse_tokens(tokens.clone()).expect("parse");
            let interpreter = Interpreter::new();
            b.iter(|| {
                let out = interpreter
                    .run_with_input(black_box(&program), std::io::empty())
                    .expect("run");
                black_box(out);
            })
        });
    }
}

criterion_group!(benches, bench_frontend);
criterion_main!(benches);
