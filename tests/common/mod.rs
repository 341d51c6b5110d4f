#![allow(dead_code)]

use flex2tasty::domain::convert::{ConversionConfig, ExtraColumn};
use std::io::Write;
use tempfile::NamedTempFile;

/// Four trades from a real Flex query: an equity sale, an equity buy, an
/// option sale, and an option that expired worthless (zero proceeds,
/// value recovered from mark-to-market P&L).
pub const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FlexQueryResponse queryName="trades" type="AF">
  <FlexStatements count="1">
    <FlexStatement accountId="U1234567" fromDate="20180901" toDate="20181130">
      <Trades>
        <Trade symbol="IAG" assetCategory="STK" buySell="SELL" openCloseIndicator="C"
               quantity="-900" tradePrice="46" proceeds="41400" ibCommission="0"
               multiplier="1" tradeDate="20181116" tradeTime="162000"
               transactionType="ExchTrade" ibOrderID="52590243"/>
        <Trade symbol="AAPL" assetCategory="STK" buySell="BUY" openCloseIndicator="O"
               quantity="100" tradePrice="179.59" proceeds="-17959" ibCommission="-1"
               multiplier="1" tradeDate="20181121" tradeTime="092808"
               transactionType="ExchTrade" ibOrderID="52611218" ibExecID="0000d323.5bf54d41"/>
        <Trade symbol="IAG   181116C00046000" underlyingSymbol="IAG" assetCategory="OPT"
               buySell="SELL" openCloseIndicator="O" quantity="-9" tradePrice="1.5"
               proceeds="1350" ibCommission="-11.25" multiplier="100" strike="46"
               expiry="20181116" putCall="C" tradeDate="20181025" tradeTime="101240"
               transactionType="ExchTrade"/>
        <Trade symbol="ULTA  181019P00250000" underlyingSymbol="ULTA" assetCategory="OPT"
               buySell="BUY" openCloseIndicator="C" quantity="45" tradePrice="0"
               proceeds="0" ibCommission="0" multiplier="100" strike="250"
               expiry="20181019" putCall="P" tradeDate="20181019" tradeTime="162000"
               transactionType="BookTrade" notes="Ep" mtmPnl="0"/>
      </Trades>
    </FlexStatement>
  </FlexStatements>
</FlexQueryResponse>
"#;

/// The same four trades through the other serializer, which emits the
/// stray attributes entry at position 0 of each collection level and
/// wraps the last trade in a singleton array.
pub const SAMPLE_JSON: &str = r#"{
  "FlexQueryResponse": [
    {"queryName": "trades", "type": "AF"},
    {
      "FlexStatements": [
        {"count": "1"},
        {
          "FlexStatement": [
            {"accountId": "U1234567"},
            {
              "Trades": {
                "Trade": [
                  {"symbol": "IAG", "assetCategory": "STK", "buySell": "SELL",
                   "openCloseIndicator": "C", "quantity": "-900", "tradePrice": 46,
                   "proceeds": 41400, "ibCommission": 0, "multiplier": 1,
                   "tradeDate": "20181116", "tradeTime": "162000",
                   "transactionType": "ExchTrade", "ibOrderID": "52590243"},
                  {"symbol": "AAPL", "assetCategory": "STK", "buySell": "BUY",
                   "openCloseIndicator": "O", "quantity": "100", "tradePrice": 179.59,
                   "proceeds": -17959, "ibCommission": -1, "multiplier": 1,
                   "tradeDate": "20181121", "tradeTime": "092808",
                   "transactionType": "ExchTrade", "ibOrderID": "52611218",
                   "ibExecID": "0000d323.5bf54d41"},
                  {"symbol": "IAG   181116C00046000", "underlyingSymbol": "IAG",
                   "assetCategory": "OPT", "buySell": "SELL", "openCloseIndicator": "O",
                   "quantity": "-9", "tradePrice": 1.5, "proceeds": 1350,
                   "ibCommission": -11.25, "multiplier": 100, "strike": "46",
                   "expiry": "20181116", "putCall": "C", "tradeDate": "20181025",
                   "tradeTime": "101240", "transactionType": "ExchTrade"},
                  [{"symbol": "ULTA  181019P00250000", "underlyingSymbol": "ULTA",
                    "assetCategory": "OPT", "buySell": "BUY", "openCloseIndicator": "C",
                    "quantity": "45", "tradePrice": "0", "proceeds": "0",
                    "ibCommission": "0", "multiplier": 100, "strike": "250",
                    "expiry": "20181019", "putCall": "P", "tradeDate": "20181019",
                    "tradeTime": "162000", "transactionType": "BookTrade",
                    "notes": "Ep", "mtmPnl": 0}]
                ]
              }
            }
          ]
        }
      ]
    }
  ]
}
"#;

/// Zero proceeds on a plain exchange trade: no rule can assign a value.
pub const UNPARSEABLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FlexQueryResponse queryName="trades" type="AF">
  <FlexStatements count="1">
    <FlexStatement accountId="U1234567">
      <Trades>
        <Trade symbol="XYZ" assetCategory="STK" buySell="BUY" openCloseIndicator="O"
               quantity="10" tradePrice="0" proceeds="0" ibCommission="0"
               multiplier="1" tradeDate="20181101" tradeTime="100000"
               transactionType="ExchTrade" notes=""/>
      </Trades>
    </FlexStatement>
  </FlexStatements>
</FlexQueryResponse>
"#;

pub const EMPTY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FlexQueryResponse queryName="trades" type="AF">
  <FlexStatements count="1">
    <FlexStatement accountId="U1234567">
      <Trades></Trades>
    </FlexStatement>
  </FlexStatements>
</FlexQueryResponse>
"#;

pub fn write_fixture(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn eastern_config() -> ConversionConfig {
    ConversionConfig {
        time_zone: "America/New_York".parse().unwrap(),
        extra_columns: Vec::new(),
    }
}

pub fn eastern_config_with(extra_columns: Vec<ExtraColumn>) -> ConversionConfig {
    ConversionConfig {
        time_zone: "America/New_York".parse().unwrap(),
        extra_columns,
    }
}
