use stress_test::{stress_test_scaling, stress_test_synthesis};

fn main() {
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            SYNTHESIS STRESS TESTS                          ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: Few tables, single-column keys
    let stats = stress_test_synthesis(4, 1, 1_000, 10_000);
    stats.print();

    // Test 2: Composite keys
    let stats = stress_test_synthesis(16, 4, 1_000, 50_000);
    stats.print();

    // Test 3: Wide schema
    let stats = stress_test_synthesis(128, 3, 200, 50_000);
    stats.print();

    // Test 4: Scaling analysis
    stress_test_scaling(256, 64);

    println!("\n✓ All stress tests completed successfully!");
}
