use anyhow::Result;
use linalg::{dot_product, multiply, Matrix, Vector};
use log::info;
use rand::Rng;

const M: usize = 3;
const N: usize = 4;
const P: usize = 2;

fn random_matrix(rows: usize, cols: usize) -> Matrix<i64> {
    let mut rng = rand::thread_rng();
    let data: Vec<i64> = (0..rows * cols).map(|_| rng.gen_range(-9..10)).collect();
    Matrix::new(data, rows, cols)
}

fn random_vector(size: usize) -> Vector<i64> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen_range(-9..10)).collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let a = random_matrix(M, N);
    let b = random_matrix(N, P);
    let c = multiply(&a, &b)?;
    info!("{}x{} * {}x{} = {}x{}", M, N, N, P, c.rows(), c.cols());

    a.print();
    println!();
    b.print();
    println!();
    c.print();

    // (A * B)^T == B^T * A^T
    assert_eq!(c.transpose(), multiply(&b.transpose(), &a.transpose())?);

    let x = random_vector(N);
    let y = &a * &x;
    for i in 0..M {
        assert_eq!(y[i], dot_product(&a[i], &x)?);
    }
    y.print();

    // mismatched shapes come back as errors
    if let Err(e) = multiply(&a, &a) {
        println!("{e}");
    }

    Ok(())
}
