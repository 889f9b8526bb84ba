//! GraphQL documents sent to the Bitquery streaming endpoint

const POOL_SLIPPAGE_FIELDS: &str = r#"
      Price {
        BtoA { Price MinAmountOut MaxAmountIn }
        AtoB { Price MinAmountOut MaxAmountIn }
        Pool {
          PoolId
          SmartContract
          Pair { Decimals SmartContract Name }
          CurrencyB { Symbol SmartContract Name Decimals }
          CurrencyA { Symbol SmartContract Name Decimals }
        }
        Dex { SmartContract ProtocolVersion ProtocolName ProtocolFamily }
        SlippageBasisPoints
      }
      Block { Time Number }"#;

const MEMPOOL_TRADE_FIELDS: &str = r#"
      Block { Time Number }
      TransactionStatus { Success }
      Fee {
        EffectiveGasPrice
        EffectiveGasPriceInUSD
        PriorityFeePerGas
        PriorityFeePerGasInUSD
        SenderFee
        SenderFeeInUSD
      }
      Trade {
        Amount
        AmountInUSD
        Buyer
        Price
        PriceInUSD
        Seller
        Sender
        Success
        Dex { ProtocolName ProtocolFamily }
        Currency { Name Symbol SmartContract }
        Side {
          Amount
          AmountInUSD
          Currency { Name Symbol SmartContract }
          Type
        }
      }
      Transaction { Hash From To }"#;

pub const POOL_SLIPPAGES_FIELD: &str = "DEXPoolSlippages";
pub const MEMPOOL_TRADES_FIELD: &str = "DEXTradeByTokens";

pub fn pool_slippages_query() -> String {
    format!(
        r#"query DEXPoolSlippages($limit: Int!) {{
  EVM(network: eth) {{
    DEXPoolSlippages(
      limit: {{ count: $limit }}
      orderBy: {{ descending: Block_Time }}
    ) {{{fields}
    }}
  }}
}}"#,
        fields = POOL_SLIPPAGE_FIELDS
    )
}

pub fn pool_slippages_by_tokens_query() -> String {
    format!(
        r#"query DEXPoolSlippagesByTokens($limit: Int!, $tokenA: String!, $tokenB: String!) {{
  EVM(network: eth) {{
    DEXPoolSlippages(
      limit: {{ count: $limit }}
      orderBy: {{ descending: Block_Time }}
      where: {{
        Price: {{
          Pool: {{
            CurrencyA: {{ SmartContract: {{ is: $tokenA }} }}
            CurrencyB: {{ SmartContract: {{ is: $tokenB }} }}
          }}
        }}
      }}
    ) {{{fields}
    }}
  }}
}}"#,
        fields = POOL_SLIPPAGE_FIELDS
    )
}

pub fn mempool_trades_query() -> String {
    format!(
        r#"query MempoolDEXTrades($limit: Int!) {{
  EVM(dataset: realtime, network: eth, mempool: true) {{
    DEXTradeByTokens(
      limit: {{ count: $limit }}
      orderBy: {{ descending: Block_Time }}
    ) {{{fields}
    }}
  }}
}}"#,
        fields = MEMPOOL_TRADE_FIELDS
    )
}

pub fn mempool_trades_by_tokens_query() -> String {
    format!(
        r#"query MempoolDEXTradesByTokens($limit: Int!, $tokenA: String!, $tokenB: String!) {{
  EVM(dataset: realtime, network: eth, mempool: true) {{
    DEXTradeByTokens(
      limit: {{ count: $limit }}
      orderBy: {{ descending: Block_Time }}
      where: {{
        Trade: {{
          Currency: {{ SmartContract: {{ is: $tokenA }} }}
          Side: {{ Currency: {{ SmartContract: {{ is: $tokenB }} }} }}
        }}
      }}
    ) {{{fields}
    }}
  }}
}}"#,
        fields = MEMPOOL_TRADE_FIELDS
    )
}
