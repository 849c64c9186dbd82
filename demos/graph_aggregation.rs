//! Graph Aggregation with CSR Kernels
//!
//! Demonstrates the sparse kernels on a small directed graph:
//! - Building an adjacency matrix from an edge list
//! - Mean neighbour aggregation (CSR × dense)
//! - Multi-head attention-weighted aggregation (3-D and packed layouts)
//! - Two-hop reachability via sparse × sparse
//!
//! Run with:
//! ```sh
//! cargo run --example graph_aggregation
//! ```

use csr_spmm::prelude::*;

fn main() -> Result<()> {
    let client = CpuClient::new().with_parallelism(ParallelismConfig::new(Some(2), None));

    // -----------------------------------------------------------------------
    // 1. Build the graph
    // -----------------------------------------------------------------------
    // Row i lists the nodes whose messages flow into node i:
    //
    //   0 <- 1, 0 <- 3
    //   1 <- 2
    //   2 <- 0, 2 <- 1, 2 <- 3
    //   3 <- (none)

    let dst = [0i64, 0, 1, 2, 2, 2];
    let src = [1i64, 3, 2, 0, 1, 3];
    let in_degree = [2.0f32, 1.0, 3.0, 0.0];
    let mean_weights: Vec<f32> = dst.iter().map(|&d| 1.0 / in_degree[d as usize]).collect();

    let adj = CsrData::from_coo(&dst, &src, &mean_weights, [4, 4])?;
    println!(
        "Adjacency: {:?}, {} edges, density {:.2}, {} bytes",
        adj.shape(),
        adj.nnz(),
        adj.density(),
        adj.memory_usage()
    );

    // -----------------------------------------------------------------------
    // 2. Mean aggregation: H' = A · H
    // -----------------------------------------------------------------------
    let features = Tensor::from_slice(
        &[1.0f32, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0],
        &[4, 2],
    );
    let aggregated = client.spmm_csr_dense(&adj, &features)?;
    println!("\nMean aggregation {}: {:?}", aggregated, aggregated.as_slice());
    // Expected:
    //   node 0: mean(h1, h3) = [1.0, 1.5]
    //   node 1: h2           = [1.0, 1.0]
    //   node 2: mean(h0, h1, h3) = [1.0, 1.0]
    //   node 3: no neighbours = [0.0, 0.0]

    // -----------------------------------------------------------------------
    // 3. Multi-head aggregation: 2 heads, 3 channels per head
    // -----------------------------------------------------------------------
    // One attention weight per edge per head, laid out as [E, H]
    let attention = Tensor::from_slice(
        &[
            0.5f32, 0.9, // 0 <- 1
            0.5, 0.1, // 0 <- 3
            1.0, 1.0, // 1 <- 2
            0.2, 0.6, // 2 <- 0
            0.3, 0.2, // 2 <- 1
            0.5, 0.2, // 2 <- 3
        ],
        &[6, 2],
    );
    let graph = CsrData::from_edge_weights(
        adj.row_ptrs().to_vec(),
        adj.col_indices().to_vec(),
        &attention,
        4,
    )?;

    let node_features: Vec<f32> = (0..24).map(|v| v as f32 * 0.1).collect();
    let per_head = Tensor::from_vec(node_features, &[4, 2, 3])?;
    let out_3d = client.spmm_csr_multihead(&graph, &per_head)?;
    println!("\nMulti-head output {}: {:?}", out_3d, out_3d.as_slice());

    // Same computation with heads packed into the feature axis. Both layouts
    // address the same buffer: [4, 2, 3] strides (6, 3, 1), [4, 6] strides (6, 1)
    let packed = per_head.reshape(&[4, 6])?;
    println!(
        "3-D strides {:?}, packed strides {:?}",
        per_head.layout().strides(),
        packed.layout().strides()
    );
    let out_flat = client.spmm_csr_multihead_flat(&graph, &packed)?;
    assert_eq!(out_flat.as_slice(), out_3d.as_slice());
    println!("Packed layout {:?} matches 3-D layout", out_flat.shape());

    // -----------------------------------------------------------------------
    // 4. Two-hop neighbourhoods: A · A
    // -----------------------------------------------------------------------
    let hops = CsrData::<f32>::from_edges(&dst, &src, [4, 4])?;
    let two_hop = client.spgemm_csr(&hops, &hops)?;
    println!("\nTwo-hop path counts ({} non-zeros):", two_hop.nnz());
    for node in 0..two_hop.nrows() {
        let (reach, paths) = two_hop.row(node);
        println!("  node {node}: reaches {reach:?} via {paths:?} paths");
    }

    println!("\nGraph aggregation example completed successfully!");
    Ok(())
}
